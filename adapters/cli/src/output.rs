//! Output formatting for markers and round summaries.

use heritage_map_core::{RegionMarker, SessionStatus};
use heritage_map_session::query::SessionSnapshot;

/// Format markers as an aligned text table.
pub(crate) fn format_markers(markers: &[RegionMarker]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Markers ({})\n", markers.len()));
    for marker in markers {
        output.push_str(&format!(
            "  {:<12} {:>7.1} {:>7.1}  {:>3}  {}\n",
            marker.id, marker.x, marker.y, marker.value, marker.label
        ));
    }
    output
}

/// Format markers as a JSON array.
pub(crate) fn format_markers_json(markers: &[RegionMarker]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(markers)
}

/// Format the end-of-round summary.
pub(crate) fn format_summary(snapshot: &SessionSnapshot) -> String {
    let mut output = String::new();
    let headline = match snapshot.status {
        SessionStatus::Finished if snapshot.time_remaining == 0 => "Time is up!",
        SessionStatus::Finished => "Round complete!",
        _ => "Round abandoned.",
    };
    output.push_str(headline);
    output.push('\n');
    output.push_str(&format!("  Score: {}\n", snapshot.score));
    output.push_str(&format!(
        "  Correct: {}/{}\n",
        snapshot.correct_answers, snapshot.total_attempts
    ));
    output.push_str(&format!("  Accuracy: {}%\n", snapshot.accuracy));
    output
}

#[cfg(test)]
mod tests {
    use super::{format_markers, format_markers_json, format_summary};
    use heritage_map_core::{RegionId, RegionMarker, SessionStatus};
    use heritage_map_session::query::SessionSnapshot;

    fn marker() -> RegionMarker {
        RegionMarker {
            id: "south-0".to_owned(),
            region_id: RegionId::South,
            x: 540.0,
            y: 310.5,
            label: "Туркестанская область".to_owned(),
            value: 2,
        }
    }

    fn finished(time_remaining: u32) -> SessionSnapshot {
        SessionSnapshot {
            status: SessionStatus::Finished,
            score: 45,
            correct_answers: 3,
            total_attempts: 3,
            accuracy: 100,
            time_remaining,
            current_object_index: 2,
            total_objects: 3,
            selected_region: None,
            last_answer: None,
        }
    }

    #[test]
    fn text_table_lists_every_marker() {
        let text = format_markers(&[marker()]);
        assert!(text.starts_with("Markers (1)\n"));
        assert!(text.contains("south-0"));
        assert!(text.contains("540.0"));
        assert!(text.contains("Туркестанская область"));
    }

    #[test]
    fn json_output_uses_camel_case() {
        let json = format_markers_json(&[marker()]).expect("serialize markers");
        assert!(json.contains("\"regionId\": \"south\""));
        assert!(json.contains("\"value\": 2"));
    }

    #[test]
    fn summary_reports_score_and_accuracy() {
        let text = format_summary(&finished(12));
        assert!(text.starts_with("Round complete!"));
        assert!(text.contains("Score: 45"));
        assert!(text.contains("Correct: 3/3"));
        assert!(text.contains("Accuracy: 100%"));
    }

    #[test]
    fn expired_rounds_say_so() {
        assert!(format_summary(&finished(0)).starts_with("Time is up!"));
    }
}
