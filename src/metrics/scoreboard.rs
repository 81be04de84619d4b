use std::fmt;

use crate::game::{Snake, SnakeId};

/// Final length of one snake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub id: SnakeId,
    /// Name of the policy that controlled the snake
    pub policy: String,
    pub length: usize,
}

/// Read-only summary of a finished round, in snake order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreReport {
    /// Build a report from final snake state; `policies[i]` names snake `i`'s controller
    pub fn from_snakes<S: AsRef<str>>(snakes: &[Snake], policies: &[S]) -> Self {
        let entries = snakes
            .iter()
            .enumerate()
            .map(|(i, snake)| ScoreEntry {
                id: snake.id,
                policy: policies
                    .get(i)
                    .map(|p| p.as_ref().to_string())
                    .unwrap_or_default(),
                length: snake.len(),
            })
            .collect();
        Self { entries }
    }

    pub fn length_of(&self, id: SnakeId) -> Option<usize> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.length)
    }

    /// Snakes sharing the greatest final length
    pub fn leaders(&self) -> Vec<SnakeId> {
        let Some(best) = self.entries.iter().map(|e| e.length).max() else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| e.length == best)
            .map(|e| e.id)
            .collect()
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scoreboard:")?;
        for entry in &self.entries {
            if entry.policy.is_empty() {
                writeln!(f, "{}: {}", entry.id, entry.length)?;
            } else {
                writeln!(f, "{} ({}): {}", entry.id, entry.policy, entry.length)?;
            }
        }
        Ok(())
    }
}
