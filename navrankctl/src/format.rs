//! Display formatting for ranking output.
//!
//! Mirrors the dashboard's conventions: percent returns with two decimals,
//! `N/A` / `—` placeholders for unavailable data, and AUM reported by the
//! backend in lakhs rendered as crores.

use navrank_model::ProgressUpdate;

pub fn format_return(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "N/A".to_string(),
    }
}

pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "—".to_string(),
    }
}

pub fn format_percent_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "—".to_string(),
    }
}

/// AUM arrives in lakhs; divide by 10 for crores and scale the label.
pub fn format_aum(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "—".to_string();
    };
    let crores = v / 10.0;
    if crores >= 10_000.0 {
        format!("₹{:.0}K Cr", crores / 1000.0)
    } else if crores >= 1000.0 {
        format!("₹{:.1}K Cr", crores / 1000.0)
    } else if crores >= 100.0 {
        format!("₹{crores:.0} Cr")
    } else {
        format!("₹{crores:.1} Cr")
    }
}

/// One-line progress summary suitable for rewriting in place.
pub fn progress_line(progress: &ProgressUpdate) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(phase) = &progress.phase {
        parts.push(format!("[{phase}]"));
    }
    if let Some(message) = &progress.message {
        parts.push(message.clone());
    }
    if let (Some(processed), Some(total)) = (progress.processed, progress.total) {
        parts.push(format!("{processed}/{total} funds"));
    }
    if let Some(percent) = progress.percent_complete() {
        parts.push(format!("{percent:.0}%"));
    }
    if let Some(eta) = progress.eta {
        parts.push(format!("ETA {}s", eta.round() as i64));
    }
    if let Some(errors) = progress.errors {
        if errors > 0 {
            parts.push(format!("{errors} errors"));
        }
    }
    if parts.is_empty() {
        parts.push("working...".to_string());
    }
    parts.join(" ")
}
