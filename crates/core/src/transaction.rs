//! Transaction type/status vocabulary and table sorting.

use crate::error::{validate_one_of, CoreError};

// ---------------------------------------------------------------------------
// Type constants
// ---------------------------------------------------------------------------

pub const TYPE_REVENUE: &str = "revenue";
pub const TYPE_EXPENSE: &str = "expense";
pub const TYPE_COMMISSION: &str = "commission";
pub const TYPE_REFUND: &str = "refund";

/// All valid transaction types.
pub const VALID_TYPES: &[&str] = &[TYPE_REVENUE, TYPE_EXPENSE, TYPE_COMMISSION, TYPE_REFUND];

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid transaction statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_COMPLETED,
    STATUS_FAILED,
    STATUS_CANCELLED,
];

/// Currency applied when a client omits one.
pub const DEFAULT_CURRENCY: &str = "USD";

pub fn validate_type(transaction_type: &str) -> Result<(), CoreError> {
    validate_one_of(transaction_type, VALID_TYPES, "transaction type")
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, VALID_STATUSES, "transaction status")
}

/// Validate an amount: finite and within `NUMERIC(12,2)`.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    validate_money("amount", amount)
}

/// Same bounds as [`validate_amount`] for any money column, named in the error.
pub fn validate_money(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value.abs() >= 1e10 {
        return Err(CoreError::Validation(format!(
            "{field} must be a finite number below 10^10, got {value}"
        )));
    }
    Ok(())
}

/// Normalize a currency code to uppercase ISO form (`usd` -> `USD`).
pub fn normalize_currency(currency: Option<&str>) -> Result<String, CoreError> {
    let code = currency.map(str::trim).unwrap_or(DEFAULT_CURRENCY);
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::Validation(format!(
            "currency must be a 3-letter code, got '{code}'"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sortable transaction table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Amount,
    Type,
    Status,
    Source,
}

impl SortField {
    /// SQL column the field sorts on.
    pub fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Amount => "amount",
            Self::Type => "transaction_type",
            Self::Status => "status",
            Self::Source => "source",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A validated `ORDER BY` for transaction listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransactionSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TransactionSort {
    /// Parse optional `sort` / `direction` query values.
    ///
    /// Missing values fall back to `created_at desc`; unknown values are
    /// rejected so they can never reach the SQL string.
    pub fn parse(sort: Option<&str>, direction: Option<&str>) -> Result<Self, CoreError> {
        let field = match sort {
            None => SortField::default(),
            Some("created_at") => SortField::CreatedAt,
            Some("amount") => SortField::Amount,
            Some("type") => SortField::Type,
            Some("status") => SortField::Status,
            Some("source") => SortField::Source,
            Some(other) => {
                return Err(CoreError::Validation(format!(
                    "Invalid sort field '{other}'. Must be one of: \
                     [\"created_at\", \"amount\", \"type\", \"status\", \"source\"]"
                )))
            }
        };
        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None => SortDirection::default(),
            Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(other) => {
                return Err(CoreError::Validation(format!(
                    "Invalid sort direction '{other}'. Must be 'asc' or 'desc'"
                )))
            }
        };
        Ok(Self { field, direction })
    }

    /// Render as an `ORDER BY` clause body, with `id` as a stable tiebreaker.
    pub fn order_by(self) -> String {
        format!(
            "{} {}, id {}",
            self.field.column(),
            self.direction.keyword(),
            self.direction.keyword()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn types_and_statuses_validate() {
        for t in VALID_TYPES {
            assert!(validate_type(t).is_ok());
        }
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_type("affiliate_commission").is_err());
        assert!(validate_status("refunded").is_err());
    }

    #[test]
    fn amount_must_be_finite_and_in_range() {
        assert!(validate_amount(19.99).is_ok());
        assert!(validate_amount(-5.0).is_ok());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(1e12).is_err());
    }

    #[test]
    fn money_errors_name_the_field() {
        assert!(validate_money("revenue", 9_999_999_999.99).is_ok());
        let err = validate_money("commission", 1e10).unwrap_err();
        assert!(err.to_string().contains("commission"));
    }

    #[test]
    fn currency_defaults_and_uppercases() {
        assert_eq!(normalize_currency(None).unwrap(), "USD");
        assert_eq!(normalize_currency(Some("eur")).unwrap(), "EUR");
        assert_matches!(normalize_currency(Some("euro")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn default_sort_is_newest_first() {
        let sort = TransactionSort::parse(None, None).unwrap();
        assert_eq!(sort.order_by(), "created_at DESC, id DESC");
    }

    #[test]
    fn sort_parses_field_and_direction() {
        let sort = TransactionSort::parse(Some("amount"), Some("ASC")).unwrap();
        assert_eq!(sort.field, SortField::Amount);
        assert_eq!(sort.order_by(), "amount ASC, id ASC");

        let by_type = TransactionSort::parse(Some("type"), None).unwrap();
        assert_eq!(by_type.order_by(), "transaction_type DESC, id DESC");
    }

    #[test]
    fn unknown_sort_values_are_rejected() {
        assert!(TransactionSort::parse(Some("amount; DROP TABLE"), None).is_err());
        assert!(TransactionSort::parse(None, Some("sideways")).is_err());
    }
}
