use std::collections::BTreeSet;

use landvest::investment::InvestmentGrade;
use landvest::listings::{
    demo_listings, run_query, LandType, ListingRecord, PageRequest, PriceRange, QueryCriteria,
    QueryError, SizeRange, SortDirection, SortKey, SortSpec,
};

fn catalog() -> Vec<ListingRecord> {
    demo_listings().expect("bundled dataset parses")
}

fn page_of(page: i64, page_size: i64) -> QueryCriteria {
    QueryCriteria {
        page: PageRequest::new(page, page_size).expect("valid page"),
        ..QueryCriteria::default()
    }
}

fn ids(listings: &[ListingRecord]) -> Vec<String> {
    listings.iter().map(|listing| listing.id.0.clone()).collect()
}

#[test]
fn first_page_of_fifteen_holds_twelve() {
    let page = run_query(&catalog(), &page_of(1, 12)).expect("valid criteria");

    assert_eq!(page.listings.len(), 12);
    assert_eq!(page.total, 15);
    assert!(page.has_more);
    assert_eq!(page.total_pages(), 2);
}

#[test]
fn second_page_holds_the_remaining_three() {
    let page = run_query(&catalog(), &page_of(2, 12)).expect("valid criteria");

    assert_eq!(page.listings.len(), 3);
    assert!(!page.has_more);
    assert_eq!(page.total_pages(), 2);
}

#[test]
fn price_range_keeps_only_listings_inside_bounds() {
    let records: Vec<ListingRecord> = catalog()
        .into_iter()
        .filter(|listing| [90_000, 450_000, 600_000].contains(&listing.price))
        .collect();
    assert_eq!(records.len(), 3);

    let criteria = QueryCriteria {
        price: PriceRange {
            min: Some(100_000),
            max: Some(500_000),
        },
        ..QueryCriteria::default()
    };
    let page = run_query(&records, &criteria).expect("valid criteria");

    assert_eq!(page.total, 1);
    assert_eq!(page.listings[0].price, 450_000);
}

#[test]
fn every_match_satisfies_every_criterion() {
    let records = catalog();
    let criteria = QueryCriteria {
        price: PriceRange {
            min: Some(200_000),
            max: Some(700_000),
        },
        size: SizeRange {
            min: Some(0.5),
            max: None,
        },
        grades: vec![InvestmentGrade::B, InvestmentGrade::C],
        page: PageRequest::new(1, 100).expect("valid page"),
        ..QueryCriteria::default()
    };

    let page = run_query(&records, &criteria).expect("valid criteria");
    let matched: BTreeSet<String> = ids(&page.listings).into_iter().collect();
    assert!(!matched.is_empty());

    for record in &records {
        let satisfies = (200_000..=700_000).contains(&record.price)
            && record.size_in_acres() >= 0.5
            && matches!(
                record.investment_grade(),
                InvestmentGrade::B | InvestmentGrade::C
            );
        assert_eq!(
            matched.contains(&record.id.0),
            satisfies,
            "listing {} misclassified",
            record.id
        );
    }
}

#[test]
fn pages_partition_the_sorted_matches() {
    let records = catalog();
    let sort = Some(SortSpec {
        key: SortKey::Roi,
        direction: SortDirection::Descending,
    });
    let everything = run_query(
        &records,
        &QueryCriteria {
            sort,
            page: PageRequest::new(1, 1_000).expect("valid page"),
            ..QueryCriteria::default()
        },
    )
    .expect("valid criteria");

    let mut collected = Vec::new();
    for page in 1..=4 {
        let result = run_query(
            &records,
            &QueryCriteria {
                sort,
                page: PageRequest::new(page, 4).expect("valid page"),
                ..QueryCriteria::default()
            },
        )
        .expect("valid criteria");
        collected.extend(ids(&result.listings));
    }

    assert_eq!(collected, ids(&everything.listings));
    let rois: Vec<f64> = everything
        .listings
        .iter()
        .map(|listing| listing.expected_roi_percent)
        .collect();
    assert!(rois.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn repeated_queries_are_identical() {
    let records = catalog();
    let criteria = QueryCriteria {
        land_types: vec![LandType::MixedUse, LandType::Residential],
        sort: Some(SortSpec {
            key: SortKey::Price,
            direction: SortDirection::Ascending,
        }),
        ..QueryCriteria::default()
    };

    let first = run_query(&records, &criteria).expect("valid criteria");
    let second = run_query(&records, &criteria).expect("valid criteria");
    assert_eq!(first, second);
    assert_eq!(records, catalog());
}

#[test]
fn zero_page_size_is_rejected() {
    let criteria = QueryCriteria {
        page: PageRequest {
            page: 1,
            page_size: 0,
        },
        ..QueryCriteria::default()
    };

    assert_eq!(
        run_query(&catalog(), &criteria),
        Err(QueryError::InvalidPageSize(0))
    );
}
