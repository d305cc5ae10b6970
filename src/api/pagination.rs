use serde::{Deserialize, Serialize};

/// page/limit query parameters shared by every list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Resolve to (page, limit, offset), clamping nonsense values.
    /// A limit above `max_limit` is clamped down to it.
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> (i64, i64, i64) {
        let page = match self.page {
            Some(p) if p > 0 => p,
            _ => 1,
        };
        let limit = match self.limit {
            Some(l) if l > 0 => l.min(max_limit),
            _ => default_limit,
        };
        (page, limit, (page - 1) * limit)
    }
}

/// Pagination envelope attached to list responses
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            // ceil(total / limit)
            total_pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(Pagination::new(1, 20, 45).total_pages, 3);
        assert_eq!(Pagination::new(1, 20, 40).total_pages, 2);
        assert_eq!(Pagination::new(1, 20, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 12, 1).total_pages, 1);
    }

    #[test]
    fn resolve_defaults_and_offsets() {
        let q = PageQuery { page: None, limit: None };
        assert_eq!(q.resolve(12, 100), (1, 12, 0));

        let q = PageQuery { page: Some(3), limit: Some(20) };
        assert_eq!(q.resolve(12, 100), (3, 20, 40));
    }

    #[test]
    fn resolve_clamps_bad_values() {
        let q = PageQuery { page: Some(0), limit: Some(-5) };
        assert_eq!(q.resolve(12, 100), (1, 12, 0));

        // Oversized limit is clamped to the maximum
        let q = PageQuery { page: Some(1), limit: Some(500) };
        assert_eq!(q.resolve(20, 100), (1, 100, 0));
        let q = PageQuery { page: Some(1), limit: Some(100) };
        assert_eq!(q.resolve(20, 100), (1, 100, 0));
    }
}
