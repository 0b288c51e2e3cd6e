//! Text scraping for wallet CLI output.
//!
//! Kept behind [`super::WalletExecutor`] so a structured API can replace it
//! without touching the scheduler.

use crate::account::NoteId;
use core_logic::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static COMMITTED_NOTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(0x[a-f0-9]{64})\s+Committed").expect("static note regex is valid")
});

/// Balance of `faucet_id` from `account --show` output, `None` when the asset
/// row is absent.
pub fn parse_balance(output: &str, faucet_id: &str) -> Result<Option<i64>, ParseError> {
    let pattern = format!(
        r"Fungible Asset\s*┆\s*{}\s*┆\s*(-?\d+)",
        regex::escape(faucet_id)
    );
    let re = Regex::new(&pattern).map_err(|e| ParseError::invalid("balance pattern", e.to_string()))?;

    match re.captures(output).and_then(|caps| caps.get(1)) {
        Some(m) => m
            .as_str()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| ParseError::invalid("balance amount", e.to_string())),
        None => Ok(None),
    }
}

/// Ids of every note listed as `Committed` by `notes -l`, in output order.
pub fn parse_committed_notes(output: &str) -> Vec<NoteId> {
    COMMITTED_NOTE
        .captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| NoteId::new(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAUCET: &str = "mtst1qzm09dk5guhtjgqqqzzzp8f2fvkz9vtx";

    #[test]
    fn balance_from_asset_table() {
        let output = format!(
            "Assets:\n┌────────────────┬──────────────────────────────────────┬────────┐\n\
             │ Asset Type     ┆ Faucet                               ┆ Amount │\n\
             │ Fungible Asset ┆ {FAUCET} ┆ 1234   │\n"
        );
        assert_eq!(parse_balance(&output, FAUCET).unwrap(), Some(1234));
    }

    #[test]
    fn balance_can_be_negative() {
        let output = format!("Fungible Asset ┆ {FAUCET} ┆ -5");
        assert_eq!(parse_balance(&output, FAUCET).unwrap(), Some(-5));
    }

    #[test]
    fn balance_absent_for_other_faucet() {
        let output = "Fungible Asset ┆ mtst1other ┆ 77";
        assert_eq!(parse_balance(output, FAUCET).unwrap(), None);
        assert_eq!(parse_balance("", FAUCET).unwrap(), None);
    }

    #[test]
    fn only_committed_notes_are_listed() {
        let a = format!("0x{}", "a".repeat(64));
        let b = format!("0x{}", "1".repeat(64));
        let c = format!("0x{}", "f".repeat(64));
        let output = format!(
            "Input Notes\n  {a}  Committed  public\n  {b} Consumed\n{c}\tCommitted\n"
        );

        let notes = parse_committed_notes(&output);

        assert_eq!(notes, vec![NoteId::new(a), NoteId::new(c)]);
    }

    #[test]
    fn no_notes_in_empty_output() {
        assert!(parse_committed_notes("No notes found").is_empty());
    }
}
