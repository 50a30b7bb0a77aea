//! Score rendering for chat replies.

use crate::{domain::Category, scoreboard::UserScore};

pub const QUESTION_MARKER: &str = "❓";
pub const ANSWER_MARKER: &str = "❗";

/// Render a score as a code block: one line of question tallies, one line of
/// answer tallies, each listing every configured rating in configured order.
pub fn format_score(score: &UserScore, ratings: &[String]) -> String {
    let mut out = String::from("```");
    push_line(&mut out, QUESTION_MARKER, score, Category::Question, ratings);
    push_line(&mut out, ANSWER_MARKER, score, Category::Answer, ratings);
    out.push_str("```");
    out
}

fn push_line(
    out: &mut String,
    marker: &str,
    score: &UserScore,
    category: Category,
    ratings: &[String],
) {
    out.push_str(marker);
    for rating in ratings {
        out.push_str(&format!("[{rating}:{}] ", score.count(category, rating)));
    }
    out.push('\n');
}
