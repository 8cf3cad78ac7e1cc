use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use ttsign_core::{Error, Resource, Result};

use crate::constants::SHOP_CIPHER;
use crate::request::{encode_path_segment, non_blank, require, ApiRequest, RequestOptions};
use crate::Client;

/// Page size used when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction of finance listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// The wire form, `ASC` or `DESC`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    /// Parse a sort order, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(Error::validation(
                "sort_order must be either 'ASC' or 'DESC'.",
            )),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a withdrawal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalType {
    /// Funds withdrawn by the seller.
    Withdraw,
    /// Settlement into the seller balance.
    Settle,
    /// Transfer between accounts.
    Transfer,
    /// Reversed withdrawal.
    Reverse,
}

impl WithdrawalType {
    /// The wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalType::Withdraw => "WITHDRAW",
            WithdrawalType::Settle => "SETTLE",
            WithdrawalType::Transfer => "TRANSFER",
            WithdrawalType::Reverse => "REVERSE",
        }
    }
}

impl FromStr for WithdrawalType {
    type Err = Error;

    /// Parse a withdrawal type, ignoring case and surrounding spaces.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WITHDRAW" => Ok(WithdrawalType::Withdraw),
            "SETTLE" => Ok(WithdrawalType::Settle),
            "TRANSFER" => Ok(WithdrawalType::Transfer),
            "REVERSE" => Ok(WithdrawalType::Reverse),
            _ => Err(Error::validation(
                "get_withdrawals supports types WITHDRAW, SETTLE, TRANSFER, or REVERSE.",
            )),
        }
    }
}

/// Paging and sorting options shared by finance listings.
#[derive(Debug, Clone, Default)]
pub struct FinancePageOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Page size within 1..=100, 20 when absent.
    pub page_size: Option<u32>,
    /// Token of the page to read.
    pub page_token: Option<String>,
    /// Field to sort by, the operation default when absent.
    pub sort_field: Option<String>,
    /// `ASC` or `DESC`, any case.
    pub sort_order: Option<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`FinancesService::get_statements`].
pub type GetStatementsOptions = FinancePageOptions;
/// Options for [`FinancesService::get_payments`].
pub type GetPaymentsOptions = FinancePageOptions;
/// Options for [`FinancesService::get_unsettled_transactions`].
pub type GetUnsettledTransactionsOptions = FinancePageOptions;

/// Options for [`FinancesService::get_withdrawals`].
#[derive(Debug, Clone, Default)]
pub struct GetWithdrawalsOptions {
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Page size within 1..=100, 20 when absent.
    pub page_size: Option<u32>,
    /// Token of the page to read.
    pub page_token: Option<String>,
    /// Withdrawal types to include, blank entries are skipped.
    pub types: Vec<String>,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`FinancesService::get_statement_transactions_by_order`].
#[derive(Debug, Clone, Default)]
pub struct GetStatementTransactionsByOrderOptions {
    /// Order id, required.
    pub order_id: String,
    /// Shop cipher, required.
    pub shop_cipher: String,
    /// Per call overrides.
    pub request: RequestOptions,
}

/// Options for [`FinancesService::get_statement_transactions_by_statement`].
#[derive(Debug, Clone, Default)]
pub struct GetStatementTransactionsByStatementOptions {
    /// Statement id, required.
    pub statement_id: String,
    /// Paging and sorting.
    pub page: FinancePageOptions,
}

/// FinancesService reads statements, payments, withdrawals and transactions.
///
/// Every operation requires a shop cipher.
#[derive(Debug, Clone)]
pub struct FinancesService {
    client: Client,
}

impl FinancesService {
    /// Create a new finances service.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List statements, sorted by `statement_time` unless told otherwise.
    pub async fn get_statements<T: DeserializeOwned>(
        &self,
        opts: GetStatementsOptions,
    ) -> Result<T> {
        self.run(async move {
            let req = paged_request(
                ApiRequest::get("/finance/202309/statements"),
                opts,
                Some("statement_time"),
            )?;
            self.client.request(req).await
        })
        .await
    }

    /// List payments.
    pub async fn get_payments<T: DeserializeOwned>(&self, opts: GetPaymentsOptions) -> Result<T> {
        self.run(async move {
            let req = paged_request(ApiRequest::get("/finance/202309/payments"), opts, None)?;
            self.client.request(req).await
        })
        .await
    }

    /// List withdrawals.
    pub async fn get_withdrawals<T: DeserializeOwned>(
        &self,
        opts: GetWithdrawalsOptions,
    ) -> Result<T> {
        self.run(async move {
            let types = opts
                .types
                .iter()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.parse::<WithdrawalType>().map(|v| v.as_str()))
                .collect::<Result<Vec<_>>>()?;

            let req = paged_request(
                ApiRequest::get("/finance/202309/withdrawals"),
                FinancePageOptions {
                    shop_cipher: opts.shop_cipher,
                    page_size: opts.page_size,
                    page_token: opts.page_token,
                    request: opts.request,
                    ..Default::default()
                },
                None,
            )?;
            let req = if types.is_empty() {
                req
            } else {
                req.query("types", types.join(","))
            };
            self.client.request(req).await
        })
        .await
    }

    /// List the statement transactions of an order.
    pub async fn get_statement_transactions_by_order<T: DeserializeOwned>(
        &self,
        opts: GetStatementTransactionsByOrderOptions,
    ) -> Result<T> {
        self.run(async move {
            let op = "get_statement_transactions_by_order";
            let order_id = require(&opts.order_id, op, "order_id")?;
            let shop_cipher = require(&opts.shop_cipher, op, "shop_cipher")?;

            let path = format!(
                "/finance/202501/orders/{}/statement_transactions",
                encode_path_segment(&order_id)
            );
            let req = ApiRequest::get(&path)
                .query(SHOP_CIPHER, shop_cipher)
                .options(opts.request);
            self.client.request(req).await
        })
        .await
    }

    /// List the transactions of a statement, sorted by `order_create_time` unless told
    /// otherwise.
    pub async fn get_statement_transactions_by_statement<T: DeserializeOwned>(
        &self,
        opts: GetStatementTransactionsByStatementOptions,
    ) -> Result<T> {
        self.run(async move {
            let statement_id = require(
                &opts.statement_id,
                "get_statement_transactions_by_statement",
                "statement_id",
            )?;

            let path = format!(
                "/finance/202501/statements/{}/statement_transactions",
                encode_path_segment(&statement_id)
            );
            let req = paged_request(ApiRequest::get(&path), opts.page, Some("order_create_time"))?;
            self.client.request(req).await
        })
        .await
    }

    /// List transactions not settled yet, sorted by `order_create_time` unless told
    /// otherwise.
    pub async fn get_unsettled_transactions<T: DeserializeOwned>(
        &self,
        opts: GetUnsettledTransactionsOptions,
    ) -> Result<T> {
        self.run(async move {
            let req = paged_request(
                ApiRequest::get("/finance/202507/orders/unsettled"),
                opts,
                Some("order_create_time"),
            )?;
            self.client.request(req).await
        })
        .await
    }

    async fn run<T>(&self, fut: impl std::future::Future<Output = Result<T>>) -> Result<T> {
        fut.await.map_err(|e| e.with_resource(Resource::Finances))
    }
}

/// Resolve the page size, [`DEFAULT_PAGE_SIZE`] when absent.
pub fn resolve_page_size(page_size: Option<u32>) -> Result<u32> {
    match page_size {
        None => Ok(DEFAULT_PAGE_SIZE),
        Some(v) if (1..=MAX_PAGE_SIZE).contains(&v) => Ok(v),
        Some(_) => Err(Error::validation(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}."
        ))),
    }
}

fn paged_request(
    req: ApiRequest,
    opts: FinancePageOptions,
    default_sort_field: Option<&str>,
) -> Result<ApiRequest> {
    let shop_cipher = opts.shop_cipher.trim();
    if shop_cipher.is_empty() {
        return Err(Error::validation(
            "finance operations require a non-empty shop_cipher.",
        ));
    }
    let page_size = resolve_page_size(opts.page_size)?;
    // An explicit but blank sort field disables the default.
    let sort_field = non_blank(opts.sort_field.as_deref().or(default_sort_field));
    let sort_order = opts
        .sort_order
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(SortOrder::from_str)
        .transpose()?;

    Ok(req
        .query(SHOP_CIPHER, shop_cipher)
        .query("page_size", page_size)
        .query_opt("page_token", non_blank(opts.page_token.as_deref()))
        .query_opt("sort_field", sort_field)
        .query_opt("sort_order", sort_order.map(|v| v.as_str()))
        .options(opts.request))
}
