//! Accounts, their working directories, and the recipient pools built from
//! the append-only account-id files.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Storage mode of an account, also used as the note type of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub const ALL: [Visibility; 2] = [Visibility::Public, Visibility::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wallet account and the client directory its CLI commands run in.
///
/// Each account is driven by exactly one scheduler, so the directory is never
/// shared between concurrent workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub visibility: Visibility,
    pub workdir: PathBuf,
}

impl Account {
    pub fn new(id: impl Into<String>, visibility: Visibility, workdir: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            visibility,
            workdir: workdir.into(),
        }
    }

    pub fn short(&self) -> String {
        truncate_address(&self.id)
    }
}

/// Identifier of a claimable/consumable note (`0x` + 64 hex chars)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> String {
        truncate_note(&self.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn slice_or_empty(s: &str, start: usize, end: usize) -> &str {
    let end = end.min(s.len());
    s.get(start.min(end)..end).unwrap_or("")
}

/// `mtst1....abcde` style shortening for log lines
pub fn truncate_address(address: &str) -> String {
    format!(
        "{}....{}",
        slice_or_empty(address, 0, 5),
        slice_or_empty(address, 27, 32)
    )
}

pub fn truncate_note(note: &str) -> String {
    format!(
        "{}....{}",
        slice_or_empty(note, 0, 6),
        slice_or_empty(note, 61, 66)
    )
}

/// Account ids read from the public and private list files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountBook {
    pub public: Vec<String>,
    pub private: Vec<String>,
}

impl AccountBook {
    pub fn load(public_file: &Path, private_file: &Path) -> Self {
        info!("Loading public and private account..");
        let book = Self {
            public: read_id_file(public_file),
            private: read_id_file(private_file),
        };
        info!(
            "Successfully loaded {} public and {} private account",
            book.public.len(),
            book.private.len()
        );
        book
    }

    pub fn ids(&self, visibility: Visibility) -> &[String] {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Private => &self.private,
        }
    }

    /// Every known id, private first, then public
    pub fn all_ids(&self) -> Vec<String> {
        self.private
            .iter()
            .chain(self.public.iter())
            .cloned()
            .collect()
    }
}

fn read_id_file(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("Failed loading account list {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

pub fn visibility_dir(clients_dir: &Path, visibility: Visibility) -> PathBuf {
    clients_dir.join(visibility.as_str())
}

pub fn client_dir(clients_dir: &Path, visibility: Visibility, index: usize) -> PathBuf {
    visibility_dir(clients_dir, visibility).join(format!("client_{}", index))
}

/// Number of `client*` directories under `clients/<visibility>`
pub fn count_client_dirs(clients_dir: &Path, visibility: Visibility) -> usize {
    let dir = visibility_dir(clients_dir, visibility);
    match fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_string_lossy()
                    .trim()
                    .split('_')
                    .next()
                    .is_some_and(|prefix| prefix.starts_with("client"))
            })
            .count(),
        Err(_) => 0,
    }
}

/// Pair every client directory with the account id at the same position.
///
/// Directory `client_{i+1}` belongs to the i-th id of its visibility list.
pub fn discover_accounts(clients_dir: &Path, book: &AccountBook) -> Vec<Account> {
    let mut accounts = Vec::new();

    for visibility in [Visibility::Private, Visibility::Public] {
        let ids = book.ids(visibility);
        let dirs = count_client_dirs(clients_dir, visibility);

        for index in 0..dirs {
            match ids.get(index) {
                Some(id) => accounts.push(Account::new(
                    id.clone(),
                    visibility,
                    client_dir(clients_dir, visibility, index + 1),
                )),
                None => warn!(
                    "{} client #{} has no saved account id. skipping..",
                    visibility,
                    index + 1
                ),
            }
        }
    }

    accounts
}

/// All known ids except `self_id`, order preserved.
pub fn recipient_pool(all_ids: &[String], self_id: &str) -> Vec<String> {
    all_ids
        .iter()
        .filter(|id| id.as_str() != self_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn recipient_pool_excludes_self_and_keeps_order() {
        let all = ids(&["A", "B", "C"]);
        assert_eq!(recipient_pool(&all, "B"), ids(&["A", "C"]));
        assert_eq!(recipient_pool(&all, "A"), ids(&["B", "C"]));
        assert_eq!(recipient_pool(&all, "Z"), all);
    }

    #[test]
    fn truncation_is_safe_on_short_input() {
        assert_eq!(truncate_address("abc"), "abc....");
        assert_eq!(
            truncate_address("mtst1qzm09dk5guhtjgqqqzzzp8f2fvkz9vtx"),
            "mtst1....f2fvk"
        );
        let note = format!("0x{}", "ab".repeat(32));
        assert_eq!(truncate_note(&note), "0xabab....babab");
    }

    #[test]
    fn account_book_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let public = dir.path().join("public.txt");
        let private = dir.path().join("private.txt");
        fs::write(&public, "pub1\n\n  pub2  \n").unwrap();
        fs::write(&private, "priv1\n").unwrap();

        let book = AccountBook::load(&public, &private);

        assert_eq!(book.public, ids(&["pub1", "pub2"]));
        assert_eq!(book.private, ids(&["priv1"]));
        assert_eq!(book.all_ids(), ids(&["priv1", "pub1", "pub2"]));
    }

    #[test]
    fn missing_account_file_is_empty() {
        let dir = tempdir().unwrap();
        let book = AccountBook::load(&dir.path().join("nope"), &dir.path().join("nope2"));
        assert_eq!(book, AccountBook::default());
    }

    #[test]
    fn discover_pairs_dirs_with_ids() {
        let dir = tempdir().unwrap();
        let clients = dir.path();
        for (vis, n) in [(Visibility::Private, 2), (Visibility::Public, 1)] {
            for i in 1..=n {
                fs::create_dir_all(client_dir(clients, vis, i)).unwrap();
            }
        }
        fs::write(visibility_dir(clients, Visibility::Public).join("notes.txt"), "x").unwrap();

        let book = AccountBook {
            public: ids(&["pubA"]),
            private: ids(&["privA"]),
        };
        let accounts = discover_accounts(clients, &book);

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].id, "privA");
        assert_eq!(accounts[0].workdir, client_dir(clients, Visibility::Private, 1));
        assert_eq!(accounts[1].id, "pubA");
        assert_eq!(accounts[1].visibility, Visibility::Public);
        assert_eq!(count_client_dirs(clients, Visibility::Private), 2);
    }
}
