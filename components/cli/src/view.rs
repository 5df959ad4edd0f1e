use console::Style;
use feed::{TransactionRecord, TxStatus};

const EMPTY_FEED: &str = "Click \"Start Simulation\" to see live transactions";

fn badge(status: TxStatus) -> String {
    let style = match status {
        TxStatus::Completed => Style::new().green().bold(),
        TxStatus::Processing => Style::new().yellow().bold(),
        TxStatus::Pending => Style::new().dim(),
    };
    let icon = match status {
        TxStatus::Completed => "✓",
        TxStatus::Processing => "⏳",
        TxStatus::Pending => "⏱",
    };
    style.apply_to(format!("{icon} {}", status.label())).to_string()
}

/// Lines of one frame: the toggle label, then a row per record or the empty placeholder.
pub(crate) fn render_frame(records: &[TransactionRecord], active: bool) -> Vec<String> {
    let toggle = if active { "Pause Simulation" } else { "Start Simulation" };
    let mut lines = vec![format!("[ {} ]", Style::new().cyan().bold().apply_to(toggle))];

    if records.is_empty() {
        lines.push(Style::new().dim().apply_to(EMPTY_FEED).to_string());
        return lines;
    }

    for record in records {
        let id = format!("Transaction #{}", record.id());
        lines.push(format!("{record:<28} {id:<24} {}", badge(record.status())));
    }
    lines
}
