use color_eyre::Result;
use precinct_map_tui::domain::DistrictAggregate;
use precinct_map_tui::export::export_url;
use precinct_map_tui::{filters, format, Tier};

use crate::app::App;

/// Run the application in headless mode (no UI)
pub async fn run_headless(app: &mut App, json: bool) -> Result<()> {
    let report = collect_report(app).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }

    Ok(())
}

/// Mount the map, wait for the initial precinct fetch and the district load,
/// and summarise the result. A failed fetch is noted in the report with no
/// precincts.
async fn collect_report(app: &mut App) -> Result<HeadlessReport> {
    app.start();
    app.map.tick();

    while app.map.is_loading() {
        app.map.wait_for_completion().await;
    }
    let error = app.map.take_failure();

    app.districts.wait().await;

    let applied = app.filters.applied();
    let features = app.map.layers().map(|layers| layers.features()).unwrap_or_default();

    let by_tier = Tier::ALL
        .into_iter()
        .map(|tier| {
            let count = features
                .iter()
                .filter(|feature| feature.properties.tier() == Some(tier))
                .count();
            (tier.as_str().to_string(), count)
        })
        .collect();
    let unclassified = features
        .iter()
        .filter(|feature| feature.properties.tier().is_none())
        .count();

    let report = HeadlessReport {
        query: filters::encode(&applied),
        precinct_count: features.len(),
        by_tier,
        unclassified,
        districts: app.districts.districts().to_vec(),
        export_url: export_url(&app.config.api_url, &applied),
        error,
    };

    app.map.teardown();
    Ok(report)
}

fn render_report(report: &HeadlessReport) {
    println!("\nPrecinct Map Report");
    println!("===================");
    println!("Applied filters: {}", report.query);
    println!("Precincts: {}", report.precinct_count);
    if let Some(error) = &report.error {
        println!("Precinct fetch failed: {error}");
    }

    println!("\nPrecincts by Tier:");
    for (tier, count) in &report.by_tier {
        println!("- {tier}: {count}");
    }
    println!("- unclassified: {}", report.unclassified);

    println!("\nDistricts:");
    if report.districts.is_empty() {
        println!("- (none loaded)");
    }
    for district in &report.districts {
        println!(
            "- {} | {} precincts | {} priority | {} target | youth {} | margin {}",
            format::district(district.cd_number),
            district.precinct_count,
            district.priority_count,
            district.target_count,
            format::percent(district.avg_youth_share),
            format::signed_percent(district.avg_dem_margin),
        );
    }

    println!("\nExport: {}", report.export_url);
}

#[derive(Debug, serde::Serialize)]
struct HeadlessReport {
    query: String,
    precinct_count: usize,
    by_tier: Vec<(String, usize)>,
    unclassified: usize,
    districts: Vec<DistrictAggregate>,
    export_url: String,
    error: Option<String>,
}
