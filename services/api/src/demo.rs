use crate::infra::{format_gbp, format_gbp_f64, load_listings};
use chrono::{Local, NaiveDate};
use clap::Args;
use landvest::config::AppConfig;
use landvest::error::AppError;
use landvest::investment::{
    default_site_profile, Estimate, EstimateResult, PortfolioHolding, PortfolioSummary,
    RiskLevel, RiskSummary, RoiEstimator, RoiInputs,
};
use landvest::listings::{
    run_query, ListingPage, ListingQueryParams, ListingRecord, PageRequest, QueryCriteria,
    SortDirection, SortKey, SortSpec,
};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct ListingSearchArgs {
    /// Free-text search over titles and descriptions
    #[arg(long)]
    pub(crate) query: Option<String>,
    /// Area name or postcode fragment
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Minimum asking price in pounds
    #[arg(long)]
    pub(crate) min_price: Option<String>,
    /// Maximum asking price in pounds
    #[arg(long)]
    pub(crate) max_price: Option<String>,
    /// Minimum size in acres
    #[arg(long)]
    pub(crate) min_size: Option<String>,
    /// Maximum size in acres
    #[arg(long)]
    pub(crate) max_size: Option<String>,
    /// Comma-separated land types (e.g. residential,mixed-use)
    #[arg(long)]
    pub(crate) land_type: Option<String>,
    /// Comma-separated planning statuses
    #[arg(long)]
    pub(crate) planning_status: Option<String>,
    /// Comma-separated investment grades
    #[arg(long)]
    pub(crate) grade: Option<String>,
    /// Comma-separated risk levels
    #[arg(long)]
    pub(crate) risk_level: Option<String>,
    /// Only listings near major infrastructure (true/false)
    #[arg(long)]
    pub(crate) near_infrastructure: Option<String>,
    /// Only featured listings (true/false)
    #[arg(long)]
    pub(crate) featured: Option<String>,
    /// price, size, roi, views or date
    #[arg(long)]
    pub(crate) sort_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    pub(crate) sort_order: Option<String>,
    #[arg(long)]
    pub(crate) page: Option<String>,
    #[arg(long)]
    pub(crate) page_size: Option<String>,
    /// Listing export to search instead of the configured catalog
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

impl ListingSearchArgs {
    fn params(&self) -> ListingQueryParams {
        ListingQueryParams {
            query: self.query.clone(),
            location: self.location.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            min_size: self.min_size.clone(),
            max_size: self.max_size.clone(),
            land_type: self.land_type.clone(),
            planning_status: self.planning_status.clone(),
            grade: self.grade.clone(),
            risk_level: self.risk_level.clone(),
            near_infrastructure: self.near_infrastructure.clone(),
            featured: self.featured.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order.clone(),
            page: self.page.clone(),
            page_size: self.page_size.clone(),
            ..ListingQueryParams::default()
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RoiEstimateArgs {
    /// Purchase price in pounds
    #[arg(long)]
    pub(crate) purchase_price: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) development_cost: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) planning_cost: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) professional_fees: f64,
    #[arg(long, default_value_t = 24)]
    pub(crate) holding_period_months: i32,
    /// Expected annual growth in percent
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) annual_growth: f64,
    /// Optional 0-100 site risk score fed to the grading policy
    #[arg(long)]
    pub(crate) risk_score: Option<u8>,
}

impl RoiEstimateArgs {
    fn inputs(&self) -> RoiInputs {
        RoiInputs {
            purchase_price: self.purchase_price,
            development_cost: self.development_cost,
            planning_cost: self.planning_cost,
            professional_fees: self.professional_fees,
            holding_period_months: self.holding_period_months,
            expected_annual_growth_percent: self.annual_growth,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Valuation date for the portfolio section (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of top listings to show
    #[arg(long, default_value_t = 5)]
    pub(crate) top: i64,
}

pub(crate) fn run_listing_search(args: ListingSearchArgs) -> Result<(), AppError> {
    let path = match args.csv.clone() {
        Some(path) => Some(path),
        None => AppConfig::load()?.listings.catalog_csv,
    };
    let listings = load_listings(path.as_deref())?;
    let criteria = args.params().into_criteria()?;

    let page = run_query(&listings, &criteria)?;
    render_listing_page(&page);
    Ok(())
}

pub(crate) fn run_roi_estimate(args: RoiEstimateArgs) -> Result<(), AppError> {
    let estimator = RoiEstimator::new(AppConfig::load()?.grading.policy());
    let result = estimator.estimate_with_risk(&args.inputs(), args.risk_score)?;
    render_estimate(&result);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { today, top } = args;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    println!("LandVest demo");
    let listings = load_listings(None)?;

    let criteria = QueryCriteria {
        sort: Some(SortSpec {
            key: SortKey::Roi,
            direction: SortDirection::Descending,
        }),
        page: PageRequest::new(1, top.max(1))?,
        ..QueryCriteria::default()
    };
    println!("\nHighest projected returns");
    render_listing_page(&run_query(&listings, &criteria)?);

    let near_infrastructure = QueryCriteria {
        near_major_infrastructure: Some(true),
        sort: Some(SortSpec {
            key: SortKey::Price,
            direction: SortDirection::Ascending,
        }),
        ..QueryCriteria::default()
    };
    println!("\nNear major infrastructure, cheapest first");
    render_listing_page(&run_query(&listings, &near_infrastructure)?);

    println!("\nROI estimate for a typical Eastside scheme");
    let inputs = RoiInputs {
        purchase_price: 450_000.0,
        development_cost: 150_000.0,
        planning_cost: 25_000.0,
        professional_fees: 15_000.0,
        holding_period_months: 24,
        expected_annual_growth_percent: 26.4,
    };
    render_estimate(&RoiEstimator::default().estimate(&inputs)?);

    println!("\nSite risk profile");
    match RiskSummary::from_factors(default_site_profile()) {
        Ok(summary) => render_risk(&summary),
        Err(err) => println!("  Risk summary unavailable: {err}"),
    }

    println!("\nPortfolio as of {today}");
    match PortfolioSummary::build(&demo_holdings(), today) {
        Ok(summary) => render_portfolio(&summary),
        Err(err) => println!("  Portfolio summary unavailable: {err}"),
    }

    Ok(())
}

fn demo_holdings() -> Vec<PortfolioHolding> {
    let date = |year, month, day| NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    vec![
        PortfolioHolding {
            listing_id: "digbeth-creative-quarter".to_string(),
            title: "Digbeth Creative Quarter Development".to_string(),
            purchase_price: 485_000,
            current_value: 572_000,
            purchase_date: date(2024, 1, 15),
        },
        PortfolioHolding {
            listing_id: "jewellery-quarter-plot".to_string(),
            title: "Jewellery Quarter Infill Plot".to_string(),
            purchase_price: 320_000,
            current_value: 298_000,
            purchase_date: date(2024, 3, 1),
        },
        PortfolioHolding {
            listing_id: "tyseley-industrial".to_string(),
            title: "Tyseley Industrial Yard".to_string(),
            purchase_price: 560_000,
            current_value: 605_000,
            purchase_date: date(2024, 6, 10),
        },
    ]
}

fn render_listing_page(page: &ListingPage) {
    if page.listings.is_empty() {
        println!("  No listings match ({} total)", page.total);
        return;
    }

    for listing in &page.listings {
        render_listing(listing);
    }
    println!(
        "  Page {} of {} | {} matching listings{}",
        page.page,
        page.total_pages(),
        page.total,
        if page.has_more { " | more available" } else { "" }
    );
}

fn render_listing(listing: &ListingRecord) {
    println!(
        "- [{}] {} ({}, {})",
        listing.investment_grade(),
        listing.title,
        listing.location,
        listing.postcode
    );
    println!(
        "  {} | {} {} | {} per acre | ROI {:.1}% | {} | {} risk{}",
        format_gbp(listing.price as i64),
        listing.size,
        listing.size_unit.label(),
        format_gbp_f64(listing.price_per_acre()),
        listing.expected_roi_percent,
        listing.planning_status.label(),
        listing.risk_level,
        if listing.near_major_infrastructure {
            " | near infrastructure"
        } else {
            ""
        }
    );
}

fn percent(metric: &Estimate<f64>) -> String {
    match metric {
        Estimate::Defined(value) => format!("{value:.2}%"),
        Estimate::Undefined(reason) => format!("undefined ({})", reason.describe()),
    }
}

fn render_estimate(result: &EstimateResult) {
    println!(
        "- Total investment {} -> expected value {} (growth x{:.3})",
        format_gbp_f64(result.total_investment),
        format_gbp_f64(result.expected_value),
        result.growth_multiplier
    );
    println!("- Net profit {}", format_gbp_f64(result.net_profit));
    println!(
        "- ROI {} | annualized {}",
        percent(&result.roi_percent),
        percent(&result.annualized_return_percent)
    );
    match result.break_even_months {
        Estimate::Defined(months) => println!("- Break-even after {months} months"),
        Estimate::Undefined(reason) => println!("- Break-even: {}", reason.describe()),
    }
    println!(
        "- Investment grade {} ({})",
        result.investment_grade,
        result.investment_grade.label()
    );
}

fn render_risk(summary: &RiskSummary) {
    println!(
        "- Overall score {} ({} risk)",
        summary.overall_score, summary.overall_level
    );
    for factor in summary.concerns(RiskLevel::Medium) {
        println!(
            "  - {}: {} ({}) {}",
            factor.category, factor.score, factor.level, factor.details
        );
    }
    for mitigation in &summary.mitigations {
        println!("  * {mitigation}");
    }
}

fn render_portfolio(summary: &PortfolioSummary) {
    println!(
        "- Value {} | invested {} | return {} ({})",
        format_gbp(summary.total_value as i64),
        format_gbp(summary.total_invested as i64),
        format_gbp(summary.total_return),
        percent(&summary.total_growth_percent)
    );
    if let Some(best) = &summary.best_performer {
        println!("- Best performer: {best}");
    }
    if let Some(worst) = &summary.worst_performer {
        println!("- Worst performer: {worst}");
    }
    if let Some(months) = summary.average_months_held() {
        println!("- Average holding period: {months:.1} months");
    }
    for holding in &summary.holdings {
        println!(
            "  - {}: {} -> {} ({}, {} months)",
            holding.title,
            format_gbp(holding.purchase_price as i64),
            format_gbp(holding.current_value as i64),
            percent(&holding.growth_percent),
            holding.months_held
        );
    }
}
