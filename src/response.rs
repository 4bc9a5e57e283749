/// Response envelope and pagination coercion
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Uniform success envelope: `{statusCode, data, message, success}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status_code: u16, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code,
            data,
            message: message.into(),
            success: status_code < 400,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Ok().json(Self::new(200, data, message))
    }

    pub fn created(data: T, message: impl Into<String>) -> HttpResponse {
        HttpResponse::Created().json(Self::new(201, data, message))
    }
}

/// Raw, untrusted pagination query parameters.
///
/// Both fields arrive as strings so that non-numeric input can fall back to
/// defaults instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Coerced pagination window. `page` is 1-based; both values are always
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;

    pub fn from_query(query: &PageQuery) -> Self {
        Self {
            page: coerce(query.page.as_deref(), Self::DEFAULT_PAGE),
            limit: coerce(query.limit.as_deref(), Self::DEFAULT_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

fn coerce(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn missing_values_fall_back_to_defaults() {
        let pg = Pagination::from_query(&query(None, None));
        assert_eq!(pg.page, 1);
        assert_eq!(pg.limit, 10);
    }

    #[test]
    fn non_numeric_values_fall_back_to_defaults() {
        let pg = Pagination::from_query(&query(Some("abc"), Some("1e3")));
        assert_eq!(pg.page, 1);
        assert_eq!(pg.limit, 10);
    }

    #[test]
    fn zero_and_negative_values_fall_back_to_defaults() {
        let pg = Pagination::from_query(&query(Some("0"), Some("-5")));
        assert_eq!(pg.page, 1);
        assert_eq!(pg.limit, 10);
    }

    #[test]
    fn valid_values_are_used() {
        let pg = Pagination::from_query(&query(Some("3"), Some("25")));
        assert_eq!(pg.page, 3);
        assert_eq!(pg.limit, 25);
        assert_eq!(pg.offset(), 50);
    }

    #[test]
    fn first_page_has_zero_offset() {
        assert_eq!(Pagination::default().offset(), 0);
    }

    #[test]
    fn success_envelope_shape() {
        let body =
            serde_json::to_value(ApiResponse::new(200, vec![1, 2], "fetched")).unwrap();
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert_eq!(body["message"], "fetched");
        assert_eq!(body["success"], true);
    }
}
