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

use std::fmt::{Debug, Formatter};
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Method};
use serde::de::DeserializeOwned;
use ttsign_core::utils::Redact;
use ttsign_core::{Context, ProxyAgent, Resource, Result};

use crate::client::{decode, execute, Outgoing};
use crate::constants::*;
use crate::request::require;

const ACCESS_TOKEN_PATH: &str = "/api/v2/token/get";
const REFRESH_TOKEN_PATH: &str = "/api/v2/token/refresh";
const AUTHORIZED_CODE_GRANT: &str = "authorized_code";
const REFRESH_TOKEN_GRANT: &str = "refresh_token";
const TOKEN_REQUEST_FAILED: &str = "Token request failed";

/// Input of [`TokenService::access_token`].
#[derive(Clone, Default)]
pub struct AccessTokenRequest {
    /// App key, required.
    pub app_key: String,
    /// App secret, required.
    pub app_secret: String,
    /// Authorization code returned to the redirect url, required.
    pub auth_code: String,
    /// Proxy for this call.
    pub proxy: Option<String>,
}

impl Debug for AccessTokenRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenRequest")
            .field("app_key", &self.app_key)
            .field("app_secret", &Redact::from(&self.app_secret))
            .field("auth_code", &Redact::from(&self.auth_code))
            .finish()
    }
}

/// Input of [`TokenService::refresh_token`].
#[derive(Clone, Default)]
pub struct RefreshTokenRequest {
    /// App key, required.
    pub app_key: String,
    /// App secret, required.
    pub app_secret: String,
    /// Refresh token of a previous exchange, required.
    pub refresh_token: String,
    /// Proxy for this call.
    pub proxy: Option<String>,
}

impl Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRequest")
            .field("app_key", &self.app_key)
            .field("app_secret", &Redact::from(&self.app_secret))
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .finish()
    }
}

/// TokenService exchanges authorization codes and refresh tokens.
///
/// Token endpoints are not signed: the app secret travels in the query string.
#[derive(Debug, Clone)]
pub struct TokenService {
    ctx: Context,
    base_url: String,
    timeout: Duration,
}

impl TokenService {
    /// Create a new token service against [`AUTH_BASE_URL`].
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            base_url: AUTH_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base url.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout, 10 seconds by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exchange an authorization code for an access token.
    pub async fn access_token<T: DeserializeOwned>(&self, input: AccessTokenRequest) -> Result<T> {
        let params = token_params(
            "access_token",
            &input.app_key,
            &input.app_secret,
            ("auth_code", &input.auth_code),
            AUTHORIZED_CODE_GRANT,
        )
        .map_err(|e| e.with_resource(Resource::Token))?;

        self.send(ACCESS_TOKEN_PATH, params, input.proxy.as_deref())
            .await
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh_token<T: DeserializeOwned>(
        &self,
        input: RefreshTokenRequest,
    ) -> Result<T> {
        let params = token_params(
            "refresh_token",
            &input.app_key,
            &input.app_secret,
            ("refresh_token", &input.refresh_token),
            REFRESH_TOKEN_GRANT,
        )
        .map_err(|e| e.with_resource(Resource::Token))?;

        self.send(REFRESH_TOKEN_PATH, params, input.proxy.as_deref())
            .await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        proxy: Option<&str>,
    ) -> Result<T> {
        let fut = async {
            let agent = ProxyAgent::resolve(proxy)?;

            let mut headers = HeaderMap::new();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));

            let value = execute(
                &self.ctx,
                Outgoing {
                    base_url: &self.base_url,
                    method: Method::GET,
                    path,
                    params: &params,
                    headers,
                    body: Bytes::new(),
                    agent,
                    timeout: self.timeout,
                    error_prefix: TOKEN_REQUEST_FAILED,
                },
            )
            .await?;
            decode(value)
        };

        fut.await.map_err(|e| e.with_resource(Resource::Token))
    }
}

/// Build the token query: app key, app secret, the grant value and the grant type.
fn token_params(
    op: &str,
    app_key: &str,
    app_secret: &str,
    (grant_key, grant_value): (&str, &str),
    grant_type: &str,
) -> Result<Vec<(String, String)>> {
    Ok(vec![
        (APP_KEY.to_string(), require(app_key, op, "app_key")?),
        ("app_secret".to_string(), require(app_secret, op, "app_secret")?),
        (grant_key.to_string(), require(grant_value, op, grant_key)?),
        ("grant_type".to_string(), grant_type.to_string()),
    ])
}
