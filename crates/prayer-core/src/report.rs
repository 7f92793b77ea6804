//! Read-only projections of a [`Roster`] shared by the CLI and the chat bot.

use crate::model::Roster;
use serde::Serialize;

/// Progress of the current cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub cycle: String,
    pub prayed: usize,
    pub total: usize,
    pub pending: Vec<String>,
}

impl Progress {
    pub fn pending_count(&self) -> usize {
        self.total - self.prayed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub people: usize,
    pub cycles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
}

/// `None` when the roster has no cycles.
pub fn progress(roster: &Roster) -> Option<Progress> {
    let cycle = roster.current_cycle()?;
    let pending: Vec<String> = roster
        .people
        .iter()
        .filter(|p| !p.flag(cycle))
        .map(|p| p.name.clone())
        .collect();
    let total = roster.people.len();
    Some(Progress {
        cycle: cycle.to_string(),
        prayed: total - pending.len(),
        total,
        pending,
    })
}

pub fn stats(roster: &Roster) -> Stats {
    Stats {
        people: roster.people.len(),
        cycles: roster.columns.len(),
        progress: progress(roster),
    }
}

/// Characters the chat's legacy Markdown mode treats as markup.
const MARKDOWN_SPECIALS: &[char] = &['_', '*', '`', '['];

/// Backslash-escape legacy Markdown markup characters.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `*text*`, or escaped plain text when `text` would break the bold entity.
/// Escapes are not honored inside an entity.
fn bold(text: &str) -> String {
    if text.contains(MARKDOWN_SPECIALS) {
        escape_markdown(text)
    } else {
        format!("*{text}*")
    }
}

/// Every participant with a per-cycle status line.
pub fn list_report(roster: &Roster) -> String {
    if roster.people.is_empty() {
        return "📋 Prayer list is empty. Add people to get started!".to_string();
    }

    let mut message = String::from("📋 *Current Prayer List:*\n\n");
    for person in &roster.people {
        message.push_str(&format!("👤 {}\n", bold(&format!("{}:", person.name))));
        for column in &roster.columns {
            let status = if person.flag(column) {
                "✅ Prayed"
            } else {
                "❌ Not yet"
            };
            message.push_str(&format!("  {}: {status}\n", escape_markdown(column)));
        }
        message.push('\n');
    }
    message
}

/// Current-cycle counts and who is still pending.
pub fn status_report(roster: &Roster) -> String {
    let Some(p) = progress(roster).filter(|p| p.total > 0) else {
        return "📋 No data available yet.".to_string();
    };

    let mut message = format!(
        "📊 {}\n\n",
        bold(&format!("Current Cycle Status: {}", p.cycle))
    );
    message.push_str(&format!("✅ Prayed: {}/{}\n", p.prayed, p.total));
    message.push_str(&format!("⏳ Pending: {}/{}\n\n", p.pending_count(), p.total));

    if p.pending.is_empty() {
        message.push_str("🎉 *Everyone has prayed in this cycle!*\n");
        message.push_str("A new cycle will be created automatically.");
    } else {
        message.push_str("*Who hasn't prayed yet:*\n");
        for name in &p.pending {
            message.push_str(&format!("  • {}\n", escape_markdown(name)));
        }
    }
    message
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;

    fn sample() -> Roster {
        let mut a = Participant::new("Abel");
        a.set_flag("Cycle 1", true);
        let b = Participant::new("Beth");
        Roster::new(vec![a, b], vec!["Cycle 1".into()])
    }

    #[test]
    fn progress_counts_current_cycle() {
        let p = progress(&sample()).unwrap();
        assert_eq!(p.cycle, "Cycle 1");
        assert_eq!(p.prayed, 1);
        assert_eq!(p.total, 2);
        assert_eq!(p.pending, vec!["Beth"]);
        assert_eq!(p.pending_count(), 1);
    }

    #[test]
    fn stats_summarize_roster() {
        let s = stats(&sample());
        assert_eq!(s.people, 2);
        assert_eq!(s.cycles, 1);
        assert!(s.progress.is_some());
    }

    #[test]
    fn list_report_marks_each_cycle() {
        let text = list_report(&sample());
        assert!(text.contains("👤 *Abel:*"));
        assert!(text.contains("Cycle 1: ✅ Prayed"));
        assert!(text.contains("Cycle 1: ❌ Not yet"));
    }

    #[test]
    fn list_report_empty_roster() {
        let text = list_report(&Roster::new(Vec::new(), Vec::new()));
        assert!(text.contains("empty"));
    }

    #[test]
    fn status_report_lists_pending() {
        let text = status_report(&sample());
        assert!(text.contains("Current Cycle Status: Cycle 1"));
        assert!(text.contains("✅ Prayed: 1/2"));
        assert!(text.contains("⏳ Pending: 1/2"));
        assert!(text.contains("• Beth"));
        assert!(!text.contains("• Abel"));
    }

    #[test]
    fn status_report_completion_notice() {
        let mut roster = sample();
        roster.set_flag(1, "Cycle 1", true).unwrap();
        let text = status_report(&roster);
        assert!(text.contains("Everyone has prayed"));
    }

    #[test]
    fn markup_in_names_is_escaped() {
        let mut odd = Participant::new("Mary_Ann *J*");
        odd.set_flag("Lent [A]", false);
        let roster = Roster::new(vec![odd], vec!["Lent [A]".into()]);

        let list = list_report(&roster);
        assert!(list.contains("👤 Mary\\_Ann \\*J\\*:\n"));
        assert!(list.contains("  Lent \\[A]: ❌ Not yet"));

        let status = status_report(&roster);
        assert!(status.contains("📊 Current Cycle Status: Lent \\[A]\n"));
        assert!(status.contains("  • Mary\\_Ann \\*J\\*\n"));
    }

    #[test]
    fn escape_markdown_leaves_plain_text() {
        assert_eq!(escape_markdown("Name 1"), "Name 1");
        assert_eq!(escape_markdown("a_b`c"), "a\\_b\\`c");
    }

    #[test]
    fn status_report_no_people() {
        let text = status_report(&Roster::new(Vec::new(), Vec::new()));
        assert_eq!(text, "📋 No data available yet.");
    }
}
