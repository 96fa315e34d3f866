//! Text rendering of a Distance Matrix result
//!
//! Failed cells show as "Not Available" rather than failing the whole table.

use comfy_table::Table;

use crate::data::MatrixResponse;

/// Placeholder shown for cells whose status is not OK
pub const NOT_AVAILABLE: &str = "Not Available";

/// Text shown in a single cell
pub fn cell_text(response: &MatrixResponse, origin: usize, destination: usize) -> String {
    match (
        response.formatted_distance(origin, destination),
        response.formatted_duration(origin, destination),
    ) {
        (Some(distance), Some(duration)) => format!("{} ({})", distance, duration),
        (Some(distance), None) => distance.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Origins down the side, destinations across the top
pub fn render_table(response: &MatrixResponse) -> String {
    let mut table = Table::new();

    let mut header = vec!["Origin".to_string()];
    header.extend(response.destinations().iter().cloned());
    table.set_header(header);

    let destinations = response.destinations().len();
    for (i, origin) in response.origins().iter().enumerate() {
        let mut row = vec![origin.clone()];
        row.extend((0..destinations).map(|j| cell_text(response, i, j)));
        table.add_row(row);
    }

    table.to_string()
}

/// One line per origin naming its nearest reachable destination
pub fn render_summary(response: &MatrixResponse) -> String {
    let mut lines: Vec<String> = response
        .origins()
        .iter()
        .enumerate()
        .map(|(i, origin)| match response.find_nearest_destination(i) {
            Some(nearest) => format!(
                "Nearest to {}: {} ({}, {})",
                origin, nearest.destination, nearest.distance.text, nearest.duration.text
            ),
            None => format!("Nearest to {}: {}", origin, NOT_AVAILABLE),
        })
        .collect();

    if !response.is_complete() {
        lines.push("Some routes could not be calculated.".to_string());
    }
    lines.join("\n")
}
