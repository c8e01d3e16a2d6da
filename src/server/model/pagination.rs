use crate::model::api::PaginatedDto;

/// Parameters for paginated queries.
#[derive(Debug, Clone, Copy)]
pub struct PageParam {
    /// Zero-indexed page number.
    pub page: u64,
    /// Number of items per page.
    pub per_page: u64,
}

/// One page of domain models together with pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Builds a page from the fetched items and the total item count.
    pub fn new(items: Vec<T>, total: u64, param: PageParam) -> Self {
        let total_pages = if param.per_page == 0 {
            0
        } else {
            total.div_ceil(param.per_page)
        };

        Self {
            items,
            total,
            page: param.page,
            per_page: param.per_page,
            total_pages,
        }
    }

    /// Converts every item with `f` and keeps the metadata.
    pub fn into_dto<D>(self, f: impl FnMut(T) -> D) -> PaginatedDto<D> {
        PaginatedDto {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_total_pages_rounding_up() {
        let page = Paginated::new(vec![1, 2], 21, PageParam { page: 0, per_page: 10 });
        assert_eq!(page.total_pages, 3);

        let exact = Paginated::new(vec![1], 20, PageParam { page: 1, per_page: 10 });
        assert_eq!(exact.total_pages, 2);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, PageParam { page: 0, per_page: 10 });
        assert_eq!(empty.total_pages, 0);
    }
}
