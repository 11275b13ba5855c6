//! Text rendering for catalog, ranking and fund views.

use navrank_model::{
    FundDetails, FundSectorView, SectorCatalog, SectorRanking, Timeframe,
};

use crate::format::{
    format_aum, format_number, format_percent_metric, format_return,
};

pub fn print_catalog(catalog: &SectorCatalog) {
    println!("{} sectors available", catalog.len());
    for sector in catalog.sectors() {
        println!("  {sector}");
    }
}

pub fn print_leaderboard(ranking: &SectorRanking) {
    println!("Sector: {} ({} funds)", ranking.sector, ranking.total_funds);
    if let Some(generated_at) = ranking.generated_at {
        println!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
    }
    for timeframe in Timeframe::ALL {
        match ranking.top_funds.leader(timeframe) {
            Some(lead) => println!(
                "  {} leader: {} — {} (AUM {})",
                timeframe.label(),
                lead.scheme_name,
                format_return(lead.returns),
                format_aum(lead.metrics.aum),
            ),
            None => println!("  {} leader: —", timeframe.label()),
        }
    }
}

pub fn print_ranking_table(ranking: &SectorRanking, timeframe: Timeframe) {
    let rows = ranking.rankings.for_timeframe(timeframe);
    if rows.is_empty() {
        println!("No ranked funds for the {} window", timeframe.label());
        return;
    }

    println!(
        "{:<5} {:<44} {:>8} {:>10} {:>6} {:>7} {:>7} {:>8} {:>7} {:>8}",
        "Rank", "Fund", "Return", "AUM", "P/E", "Exp%", "Sharpe", "Sortino",
        "StdDev", "MaxDD"
    );
    for row in rows {
        let m = &row.metrics;
        let mut name = truncate(&row.scheme_name, 42);
        if !row.is_active {
            name.push_str(" *");
        }
        println!(
            "{:<5} {:<44} {:>8} {:>10} {:>6} {:>7} {:>7} {:>8} {:>7} {:>8}",
            row.rank,
            name,
            format_return(row.returns),
            format_aum(m.aum),
            format_number(m.pe_ratio, 1),
            format_percent_metric(m.expense_ratio),
            format_number(m.sharpe_ratio, 2),
            format_number(m.sortino_ratio, 2),
            format_number(m.standard_deviation, 2),
            format_percent_metric(m.max_drawdown),
        );
    }
    println!(
        "Showing {} funds • \"*\" = inactive scheme • \"—\" = data unavailable",
        rows.len()
    );
}

pub fn print_fund(details: &FundDetails) {
    println!("{} ({})", details.scheme_name, details.scheme_code);
    if let Some(sector) = &details.sector {
        println!("Sector: {sector}");
    }
    if !details.is_active {
        println!("Status: inactive");
    }
    for timeframe in Timeframe::ALL {
        println!(
            "  {} return: {}",
            timeframe.label(),
            format_return(details.returns.for_timeframe(timeframe)),
        );
    }
    let m = &details.metrics;
    println!("  AUM: {}", format_aum(m.aum));
    println!("  Expense: {}", format_percent_metric(m.expense_ratio));
    println!("  Sharpe: {}", format_number(m.sharpe_ratio, 2));
}

pub fn print_fund_sector(view: &FundSectorView) {
    print_fund(&view.fund);
    println!();
    println!("Position within {}:", view.sector_ranking.sector);
    for timeframe in Timeframe::ALL {
        let total = view.sector_ranking.rankings.for_timeframe(timeframe).len();
        match view.rank_in_sector(timeframe) {
            Some(rank) => {
                println!("  {}: #{rank} of {total}", timeframe.label())
            }
            None => println!("  {}: unranked", timeframe.label()),
        }
    }
}

fn truncate(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }
    let mut out: String = name.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
