use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;

use tradedoc_core::traits::ReportSink;

/// Plain-text tables with padded columns, markdown passed through as-is.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self { Self { out: std::io::stdout() } }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self { Self { out } }

    pub fn into_inner(self) -> W { self.out }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn table(&mut self, title: &str, columns: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()> {
        let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        if !title.is_empty() {
            writeln!(self.out, "\n{}", title)?;
        }
        writeln!(self.out, "{}", pad_row(columns.iter().copied(), &widths))?;
        writeln!(self.out, "{}", widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "))?;
        for row in rows {
            writeln!(self.out, "{}", pad_row(row.iter().map(String::as_str), &widths))?;
        }
        Ok(())
    }

    fn markdown(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells.zip(widths).map(|(c, w)| format!("{:<width$}", c, width = *w)).collect::<Vec<_>>().join("  ").trim_end().to_string()
}

/// Accumulates a markdown document in memory.
#[derive(Debug, Default)]
pub struct MarkdownSink {
    buf: String,
}

impl MarkdownSink {
    pub fn new() -> Self { Self::default() }

    pub fn as_str(&self) -> &str { &self.buf }

    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.buf)?;
        Ok(())
    }
}

fn escape_cell(cell: &str) -> String { cell.replace('|', "\\|").replace('\n', " ") }

impl ReportSink for MarkdownSink {
    fn table(&mut self, title: &str, columns: &[&str], rows: &[Vec<String>]) -> anyhow::Result<()> {
        if !title.is_empty() {
            writeln!(self.buf, "### {}\n", title)?;
        }
        writeln!(self.buf, "| {} |", columns.join(" | "))?;
        writeln!(self.buf, "|{}|", columns.iter().map(|c| "-".repeat(c.len() + 2)).collect::<Vec<_>>().join("|"))?;
        for row in rows {
            writeln!(self.buf, "| {} |", row.iter().map(|c| escape_cell(c)).collect::<Vec<_>>().join(" | "))?;
        }
        self.buf.push('\n');
        Ok(())
    }

    fn markdown(&mut self, text: &str) -> anyhow::Result<()> {
        self.buf.push_str(text);
        if !text.ends_with('\n') {
            self.buf.push('\n');
        }
        self.buf.push('\n');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_table_pads_columns() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.table("Types", &["Type", "Count"], &[vec!["invoice".into(), "12".into()], vec!["po".into(), "3".into()]]).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "Types");
        assert_eq!(lines[2], "Type     Count");
        assert_eq!(lines[4], "invoice  12");
        assert_eq!(lines[5], "po       3");
    }

    #[test]
    fn markdown_table_escapes_pipes() {
        let mut sink = MarkdownSink::new();
        sink.table("", &["Metric", "Value"], &[vec!["a|b".into(), "1".into()]]).unwrap();
        assert_eq!(sink.as_str(), "| Metric | Value |\n|--------|-------|\n| a\\|b | 1 |\n\n");
    }
}
