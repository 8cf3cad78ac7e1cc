// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! TikTok Shop support with convenience APIs.

pub use ttsign_tiktok_shop::*;

#[cfg(feature = "default-context")]
use crate::default_context;

/// Create a client configured from the environment.
///
/// The client uses [`default_context`] and a [`Config`] loaded from the
/// `TIKTOK_SHOP_*` variables.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> ttsign::Result<()> {
/// use serde_json::Value;
/// use ttsign::tiktok_shop::{default_client, GetOrderDetailOptions};
///
/// let orders: Value = default_client()
///     .with_access_token("my-access-token")
///     .orders()
///     .get_order_detail(GetOrderDetailOptions {
///         ids: vec!["576461413038785752".to_string()],
///         shop_cipher: Some("my-shop-cipher".to_string()),
///         ..Default::default()
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "default-context")]
pub fn default_client() -> Client {
    Client::from_config(default_context(), Config::default())
}

/// Create a token service using [`default_context`].
#[cfg(feature = "default-context")]
pub fn default_token_service() -> TokenService {
    TokenService::new(default_context())
}

/// Create a document service using [`default_context`].
#[cfg(feature = "default-context")]
pub fn default_document_service() -> DocumentService {
    DocumentService::new(default_context())
}
