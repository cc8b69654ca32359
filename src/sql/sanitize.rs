use crate::constants::EXPLANATION_MARKERS;

/// Reduce raw model output to a single terminated statement
///
/// Steps, in order:
/// 1. Output with a fence line anywhere keeps only the lines inside the fences
/// 2. Blank lines and `--` / `#` comment lines are dropped
/// 3. The first line carrying an explanation marker ends the statement
/// 4. Remaining lines are joined with single spaces
/// 5. Trailing `;` are stripped and exactly one is appended
///
/// Never fails. Garbage in gives a short, likely-invalid statement out,
/// which shape validation then rejects.
pub fn sanitize(raw: &str) -> String {
    let text = raw.trim();

    let fenced = text.lines().any(|line| line.trim_start().starts_with("```"));
    let lines: Vec<&str> = if fenced {
        fenced_lines(text)
    } else {
        text.lines().collect()
    };

    let mut kept = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") || line.starts_with('#') {
            continue;
        }

        let lower = line.to_lowercase();
        if EXPLANATION_MARKERS.iter().any(|marker| lower.contains(marker)) {
            break;
        }

        kept.push(line);
    }

    let joined = kept.join(" ");
    let statement = joined.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    format!("{statement};")
}

/// Lines between opening and closing fences; a missing closing fence keeps the rest
fn fenced_lines(text: &str) -> Vec<&str> {
    let mut inside = false;
    let mut lines = Vec::new();

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            inside = !inside;
            continue;
        }
        if inside {
            lines.push(line);
        }
    }

    lines
}
