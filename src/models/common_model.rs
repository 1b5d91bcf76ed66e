use serde::Serialize;

/// Page envelope: results plus total count and next/previous page markers.
#[derive(Serialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: u64, page: u64, limit: u64) -> Self {
        let pages = if limit == 0 { 0 } else { count.div_ceil(limit) };
        let next = (page < pages).then_some(page + 1);
        let previous = (page > 1).then_some(page - 1);
        Paginated {
            count,
            next,
            previous,
            results,
        }
    }
}
