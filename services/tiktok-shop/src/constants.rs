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

use std::time::Duration;

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Endpoints used by TikTok Shop.
pub const OPEN_API_BASE_URL: &str = "https://open-api.tiktokglobalshop.com";
pub const AUTH_BASE_URL: &str = "https://auth.tiktok-shops.com";

// Headers used by TikTok Shop.
pub const X_TTS_ACCESS_TOKEN: &str = "x-tts-access-token";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";
pub const CONTENT_TYPE_PDF: &str = "application/pdf";

// Query parameters managed by the signer.
pub const APP_KEY: &str = "app_key";
pub const TIMESTAMP: &str = "timestamp";
pub const SIGN: &str = "sign";
pub const ACCESS_TOKEN: &str = "access_token";
pub const SHOP_CIPHER: &str = "shop_cipher";

// Legacy request defaults.
pub const LEGACY_VERSION: &str = "202212";

// Env values used by TikTok Shop.
pub const TIKTOK_SHOP_APP_KEY: &str = "TIKTOK_SHOP_APP_KEY";
pub const TIKTOK_SHOP_APP_SECRET: &str = "TIKTOK_SHOP_APP_SECRET";
pub const TIKTOK_SHOP_ACCESS_TOKEN: &str = "TIKTOK_SHOP_ACCESS_TOKEN";
pub const TIKTOK_SHOP_PROXY: &str = "TIKTOK_SHOP_PROXY";
pub const TIKTOK_SHOP_BASE_URL: &str = "TIKTOK_SHOP_BASE_URL";
pub const TIKTOK_SHOP_TIMEOUT: &str = "TIKTOK_SHOP_TIMEOUT";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DOCUMENT_TIMEOUT: Duration = Duration::from_secs(15);

/// AsciiSet for identifiers embedded in request paths.
///
/// - Encode every byte except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub static PATH_SEGMENT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');
