//! Framed error reports for the build script

/// Characters between the frame's side padding
const WIDTH: usize = 64;

/// Shorten a line to at most `WIDTH` characters
pub fn fit(line: &str) -> String {
    if line.chars().count() > WIDTH {
        let mut short: String = line.chars().take(WIDTH - 3).collect();
        short.push_str("...");
        short
    } else {
        line.to_string()
    }
}

/// Render a title and its detail lines inside a box
pub fn frame(title: &str, lines: &[String]) -> String {
    let rule = "═".repeat(WIDTH + 4);
    let row = |text: &str| format!("║  {:<width$}  ║\n", fit(text), width = WIDTH);

    let mut out = format!("\n╔{}╗\n", rule);
    out += &row(&format!("ERROR: {}", title));
    if !lines.is_empty() {
        out += &format!("╠{}╣\n", rule);
        for line in lines {
            out += &row(line);
        }
    }
    out += &format!("╚{}╝\n", rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_cuts_on_char_boundary() {
        let line = "é".repeat(100);
        let short = fit(&line);
        assert_eq!(short.chars().count(), WIDTH);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_fit_keeps_short_lines() {
        assert_eq!(fit("missing field `name`"), "missing field `name`");
    }

    #[test]
    fn test_frame_rows_align() {
        let lines = vec!["ü".repeat(80), "• port must be A-F".to_string()];
        let report = frame("Invalid board.toml", &lines);
        let widths: Vec<usize> = report
            .lines()
            .filter(|l| !l.is_empty())
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 6);
        assert!(widths.iter().all(|&w| w == WIDTH + 6));
    }
}
