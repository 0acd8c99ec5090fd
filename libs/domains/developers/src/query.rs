//! Directory query engine.
//!
//! One synchronous pass over the record set: term filter, role filter,
//! sort, paginate. The engine never touches storage; callers hand it a
//! snapshot slice and get an owned page back, so running the same query
//! twice over the same snapshot gives the same page.

use crate::models::{Developer, DirectoryQuery};

/// Page size applied when the client sends none (or zero)
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One page of query results plus the counters the pagination block needs
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    /// Records that matched the filters, across all pages
    pub total: usize,
    /// 1-based page that was served (after clamping)
    pub page: usize,
    /// Page size that was applied (after clamping)
    pub limit: usize,
}

/// Recognized sort orders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortKey {
    ExperienceAsc,
    ExperienceDesc,
    /// Default: creation time, newest first
    NewestFirst,
}

impl SortKey {
    /// Unrecognized or absent values fall back to the default ordering,
    /// they are not an error.
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("experience-asc") => SortKey::ExperienceAsc,
            Some("experience-desc") => SortKey::ExperienceDesc,
            _ => SortKey::NewestFirst,
        }
    }
}

fn matches_search(dev: &Developer, term: &str) -> bool {
    let term = term.to_lowercase();
    dev.name.to_lowercase().contains(&term)
        || dev
            .tech_stack
            .iter()
            .any(|t| t.to_lowercase().contains(&term))
}

/// Run a directory query over a snapshot of records.
///
/// Filters are conjunctive: a record must match the search term (name or
/// tech stack, case-insensitive substring) and the exact role display form.
/// A role value that names no known role yields an empty page, not an error.
/// Sorting is stable; pagination clamps rather than failing, so a page past
/// the end of the results is an empty slice.
pub fn run_query(records: &[Developer], query: &DirectoryQuery) -> QueryPage<Developer> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let role = query
        .role
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut matched: Vec<&Developer> = records
        .iter()
        .filter(|dev| search.is_none_or(|term| matches_search(dev, term)))
        .filter(|dev| role.is_none_or(|r| dev.role.to_string() == r))
        .collect();

    match SortKey::parse(query.sort_by.as_deref()) {
        SortKey::ExperienceAsc => matched.sort_by(|a, b| a.experience.total_cmp(&b.experience)),
        SortKey::ExperienceDesc => matched.sort_by(|a, b| b.experience.total_cmp(&a.experience)),
        SortKey::NewestFirst => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    let total = matched.len();
    let page = query.page.max(1);
    let limit = if query.limit == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        query.limit
    };

    let start = (page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);
    let items = matched[start..end].iter().map(|d| (*d).clone()).collect();

    QueryPage {
        items,
        total,
        page,
        limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateDeveloper, Role};
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn developer(name: &str, role: Role, experience: f64, age_minutes: i64) -> Developer {
        let mut dev = Developer::new(
            CreateDeveloper {
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                role,
                tech_stack: vec!["Rust".to_string(), "TypeScript".to_string()],
                experience,
                description: "A developer in the directory.".to_string(),
                joining_date: None,
                photo: None,
            },
            Uuid::new_v4(),
        );
        dev.created_at = Utc::now() - Duration::minutes(age_minutes);
        dev
    }

    fn query() -> DirectoryQuery {
        DirectoryQuery::default()
    }

    #[test]
    fn test_search_matches_name_and_tech_stack() {
        let mut records = vec![
            developer("Alice", Role::Frontend, 2.0, 3),
            developer("Bob", Role::Backend, 5.0, 2),
        ];
        records[1].tech_stack = vec!["Go".to_string(), "alicedb".to_string()];

        let q = DirectoryQuery {
            search: Some("ALICE".to_string()),
            ..query()
        };
        let page = run_query(&records, &q);

        // Name match and tech-stack match both count
        assert_eq!(page.total, 2);
        for dev in &page.items {
            let term_in_name = dev.name.to_lowercase().contains("alice");
            let term_in_stack = dev
                .tech_stack
                .iter()
                .any(|t| t.to_lowercase().contains("alice"));
            assert!(term_in_name || term_in_stack);
        }
    }

    #[test]
    fn test_role_filter_exact_match() {
        let records = vec![
            developer("Alice", Role::Frontend, 2.0, 3),
            developer("Bob", Role::Backend, 5.0, 2),
            developer("Cara", Role::FullStack, 1.0, 1),
        ];

        let q = DirectoryQuery {
            role: Some("Full-Stack".to_string()),
            ..query()
        };
        let page = run_query(&records, &q);
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Cara");
    }

    #[test]
    fn test_unknown_role_yields_empty_not_error() {
        let records = vec![developer("Alice", Role::Frontend, 2.0, 1)];
        let q = DirectoryQuery {
            role: Some("Wizard".to_string()),
            ..query()
        };
        let page = run_query(&records, &q);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_worked_example_role_filter_and_sort() {
        // [Alice(Frontend, 2), Bob(Backend, 5), Cara(Frontend, 1)],
        // role=Frontend sort=experience-desc => [Alice, Cara], total 2
        let records = vec![
            developer("Alice", Role::Frontend, 2.0, 3),
            developer("Bob", Role::Backend, 5.0, 2),
            developer("Cara", Role::Frontend, 1.0, 1),
        ];

        let q = DirectoryQuery {
            role: Some("Frontend".to_string()),
            sort_by: Some("experience-desc".to_string()),
            ..query()
        };
        let page = run_query(&records, &q);

        assert_eq!(page.total, 2);
        let names: Vec<_> = page.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Cara"]);
    }

    #[test]
    fn test_asc_is_reverse_of_desc() {
        let records = vec![
            developer("Alice", Role::Frontend, 2.0, 3),
            developer("Bob", Role::Backend, 5.0, 2),
            developer("Cara", Role::FullStack, 1.0, 1),
        ];

        let asc = run_query(
            &records,
            &DirectoryQuery {
                sort_by: Some("experience-asc".to_string()),
                ..query()
            },
        );
        let desc = run_query(
            &records,
            &DirectoryQuery {
                sort_by: Some("experience-desc".to_string()),
                ..query()
            },
        );

        let mut asc_names: Vec<_> = asc.items.iter().map(|d| d.name.clone()).collect();
        let desc_names: Vec<_> = desc.items.iter().map(|d| d.name.clone()).collect();
        asc_names.reverse();
        assert_eq!(asc_names, desc_names);
    }

    #[test]
    fn test_unrecognized_sort_falls_back_to_newest_first() {
        let records = vec![
            developer("Oldest", Role::Backend, 1.0, 30),
            developer("Newest", Role::Backend, 2.0, 1),
            developer("Middle", Role::Backend, 3.0, 10),
        ];

        let q = DirectoryQuery {
            sort_by: Some("name-asc".to_string()),
            ..query()
        };
        let page = run_query(&records, &q);
        let names: Vec<_> = page.items.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Newest", "Middle", "Oldest"]);
    }

    #[test]
    fn test_page_beyond_range_is_empty() {
        // total=5, limit=10, page=3 => empty page, total still 5
        let records: Vec<_> = (0..5)
            .map(|i| developer(&format!("Dev{}", i), Role::Backend, i as f64, i))
            .collect();

        let q = DirectoryQuery {
            page: 3,
            limit: 10,
            ..query()
        };
        let page = run_query(&records, &q);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn test_pagination_partitions_results() {
        let records: Vec<_> = (0..25)
            .map(|i| developer(&format!("Dev{:02}", i), Role::Backend, i as f64, i))
            .collect();

        let mut seen = Vec::new();
        for page_num in 1..=3 {
            let q = DirectoryQuery {
                sort_by: Some("experience-asc".to_string()),
                page: page_num,
                limit: 10,
                ..query()
            };
            let page = run_query(&records, &q);
            assert_eq!(page.total, 25);
            seen.extend(page.items.into_iter().map(|d| d.name));
        }

        // Three pages cover every record exactly once, in order
        assert_eq!(seen.len(), 25);
        let expected: Vec<_> = (0..25).map(|i| format!("Dev{:02}", i)).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_zero_limit_clamps_to_default() {
        let records: Vec<_> = (0..15)
            .map(|i| developer(&format!("Dev{}", i), Role::Backend, i as f64, i))
            .collect();

        let q = DirectoryQuery {
            limit: 0,
            ..query()
        };
        let page = run_query(&records, &q);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.items.len(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_zero_page_clamps_to_first() {
        let records = vec![developer("Alice", Role::Frontend, 2.0, 1)];
        let q = DirectoryQuery {
            page: 0,
            ..query()
        };
        let page = run_query(&records, &q);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_query_is_idempotent_over_snapshot() {
        let records = vec![
            developer("Alice", Role::Frontend, 2.0, 3),
            developer("Bob", Role::Backend, 5.0, 2),
        ];
        let q = DirectoryQuery {
            search: Some("e".to_string()),
            sort_by: Some("experience-asc".to_string()),
            ..query()
        };

        let first = run_query(&records, &q);
        let second = run_query(&records, &q);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_search_is_noop() {
        let records = vec![
            developer("Alice", Role::Frontend, 2.0, 2),
            developer("Bob", Role::Backend, 5.0, 1),
        ];
        let q = DirectoryQuery {
            search: Some("   ".to_string()),
            ..query()
        };
        assert_eq!(run_query(&records, &q).total, 2);
    }
}
