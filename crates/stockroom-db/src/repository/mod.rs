//! # Repository Module
//!
//! Row-level access to the three tables.
//!
//! ## Executor-Generic Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every query function takes any sqlx executor:                          │
//! │                                                                         │
//! │    ProductRepository::find_by_id(&pool, id)        ← standalone read   │
//! │    ProductRepository::find_by_id(&mut *tx, id)     ← inside a tx       │
//! │                                                                         │
//! │  The coordinator opens one transaction and threads `&mut *tx` through  │
//! │  the product store, the sale store and the stock ledger, so all of     │
//! │  their writes commit or roll back together.                            │
//! │                                                                         │
//! │  The `&self` methods are pool conveniences for plain reads.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - product rows (quantity writes belong to the ledger)
//! - [`SaleRepository`](sale::SaleRepository) - sale rows, filtered listing, window totals
//! - [`StaffRepository`](staff::StaffRepository) - the staff directory

pub mod product;
pub mod sale;
pub mod staff;

/// Escapes `%`, `_` and `\` for use in `LIKE ... ESCAPE '\'`.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("cement"), "cement");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
