//! Result presentation
//!
//! Turns the raw paths returned by the search pipeline into items the host
//! can render: a display label (optionally with the shared leading path
//! replaced by `...`), a primary action that opens the path, and a secondary
//! action chosen by the `alt_enter_action` preference.
//!
//! Inert items (informational and error messages) share the same output
//! shape, so every outcome of a query renders as one list.

use crate::preferences::{AltEnterAction, Preferences};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Icon for informational items
pub const ICON: &str = "images/icon.png";
/// Icon for error items
pub const ERROR_ICON: &str = "images/error.png";
/// Icon for search results
pub const RESULT_ICON: &str = "images/sub-icon.png";

/// Marker substituted for the trimmed path prefix
pub const ELLIPSIS: &str = "...";

/// Something the host does when an item is activated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Open a file or directory with the desktop's default handler
    Open { path: String },
    /// Put text on the clipboard
    CopyToClipboard { text: String },
    /// Ignore the activation
    DoNothing,
}

impl Action {
    /// Open `path` with the default handler
    #[must_use]
    pub fn open(path: impl Into<String>) -> Self {
        Self::Open { path: path.into() }
    }

    /// Copy `text` to the clipboard
    #[must_use]
    pub fn copy_to_clipboard(text: impl Into<String>) -> Self {
        Self::CopyToClipboard { text: text.into() }
    }
}

/// One search result ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedItem {
    /// Label shown to the user, possibly trimmed
    pub display_label: String,
    /// The untouched path as printed by the filter
    pub target_path: String,
    /// Run on enter, always opens `target_path`
    pub primary_action: Action,
    /// Run on alt+enter
    pub secondary_action: Action,
}

/// Item size as understood by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Result,
    SmallResult,
}

/// An item in a rendered result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: ItemKind,
    /// Icon path relative to the extension root
    pub icon: String,
    /// Text shown in the list
    pub name: String,
    pub on_enter: Action,
    /// `None` for inert items
    pub on_alt_enter: Option<Action>,
}

impl ResultItem {
    /// An item that does nothing when activated
    #[must_use]
    pub fn inert(name: impl Into<String>, icon: &str) -> Self {
        Self {
            kind: ItemKind::Result,
            icon: icon.to_string(),
            name: name.into(),
            on_enter: Action::DoNothing,
            on_alt_enter: None,
        }
    }

    /// Whether activating the item has any effect
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.on_enter == Action::DoNothing && self.on_alt_enter.is_none()
    }
}

impl From<PresentedItem> for ResultItem {
    fn from(item: PresentedItem) -> Self {
        Self {
            kind: ItemKind::SmallResult,
            icon: RESULT_ICON.to_string(),
            name: item.display_label,
            on_enter: item.primary_action,
            on_alt_enter: Some(item.secondary_action),
        }
    }
}

/// One inert item per message
#[must_use]
pub fn no_op_result_items<S: AsRef<str>>(messages: &[S], icon: &str) -> Vec<ResultItem> {
    messages
        .iter()
        .map(|message| ResultItem::inert(message.as_ref(), icon))
        .collect()
}

/// Longest component-wise path shared by all `paths`
///
/// Returns `None` for an empty slice or when absolute and relative paths are
/// mixed.
#[must_use]
pub fn common_path<P: AsRef<Path>>(paths: &[P]) -> Option<PathBuf> {
    let (first, rest) = paths.split_first()?;
    let first = first.as_ref();
    let mut shared: Vec<Component<'_>> = first.components().collect();

    for path in rest {
        let path = path.as_ref();
        if path.is_absolute() != first.is_absolute() {
            return None;
        }
        let len = shared
            .iter()
            .zip(path.components())
            .take_while(|(a, b)| *a == b)
            .count();
        shared.truncate(len);
    }

    Some(shared.iter().collect())
}

/// Prefix to replace with [`ELLIPSIS`], if trimming applies
///
/// The prefix is the parent of the common path, so the deepest shared
/// directory stays visible. Nothing is trimmed when the parent is the root or
/// empty, or when there are fewer than two results.
#[must_use]
pub fn path_prefix<S: AsRef<str>>(results: &[S], trim_path: bool) -> Option<String> {
    if !trim_path || results.len() < 2 {
        return None;
    }

    let paths: Vec<&Path> = results.iter().map(|r| Path::new(r.as_ref())).collect();
    let prefix = common_path(&paths)
        .as_deref()
        .and_then(Path::parent)
        .filter(|parent| !parent.as_os_str().is_empty() && parent.parent().is_some())
        .map(|parent| parent.display().to_string());

    tracing::debug!(prefix = prefix.as_deref().unwrap_or(""), "Path prefix for results");
    prefix
}

/// Label for `path`, with a leading `prefix` replaced by [`ELLIPSIS`]
#[must_use]
pub fn display_name(path: &str, prefix: Option<&str>) -> String {
    match prefix.and_then(|prefix| path.strip_prefix(prefix)) {
        Some(rest) => format!("{ELLIPSIS}{rest}"),
        None => path.to_string(),
    }
}

/// The path itself when it is a directory, otherwise its parent
#[must_use]
pub fn dirname(path: &str) -> String {
    let p = Path::new(path);
    if p.is_dir() {
        return path.to_string();
    }
    match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => ".".to_string(),
    }
}

/// Secondary action for `path` under the given preference
#[must_use]
pub fn alt_enter_action(action: AltEnterAction, path: &str) -> Action {
    match action {
        AltEnterAction::OpenPath => Action::open(dirname(path)),
        AltEnterAction::CopyPath => Action::copy_to_clipboard(path),
    }
}

/// Present every raw result, preserving order
#[must_use]
pub fn generate_result_items<S: AsRef<str>>(
    preferences: &Preferences,
    results: &[S],
) -> Vec<PresentedItem> {
    let prefix = path_prefix(results, preferences.trim_display_path);

    results
        .iter()
        .map(|result| {
            let path = result.as_ref();
            PresentedItem {
                display_label: display_name(path, prefix.as_deref()),
                target_path: path.to_string(),
                primary_action: Action::open(path),
                secondary_action: alt_enter_action(preferences.alt_enter_action, path),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn prefs(trim: bool, alt: AltEnterAction) -> Preferences {
        let mut preferences = Preferences::with_base_dir("/home/u");
        preferences.trim_display_path = trim;
        preferences.alt_enter_action = alt;
        preferences
    }

    fn labels(items: &[PresentedItem]) -> Vec<&str> {
        items.iter().map(|item| item.display_label.as_str()).collect()
    }

    #[test]
    fn test_common_path() {
        assert_eq!(
            common_path(&["/home/u/docs/a.txt", "/home/u/docs/b.txt"]),
            Some(PathBuf::from("/home/u/docs"))
        );
        assert_eq!(
            common_path(&["/home/u/docs/a.txt", "/home/user/b.txt"]),
            Some(PathBuf::from("/home"))
        );
        assert_eq!(common_path(&["/a", "/b"]), Some(PathBuf::from("/")));
        assert_eq!(common_path(&["a/b", "/a/b"]), None);
        assert_eq!(common_path::<&str>(&[]), None);
    }

    #[test]
    fn test_trims_shared_prefix() {
        let results = ["/home/u/docs/a.txt", "/home/u/docs/b.txt"];
        let items = generate_result_items(&prefs(true, AltEnterAction::OpenPath), &results);
        assert_eq!(labels(&items), vec![".../docs/a.txt", ".../docs/b.txt"]);
        assert_eq!(items[0].target_path, "/home/u/docs/a.txt");
    }

    #[test]
    fn test_trim_disabled_keeps_raw_paths() {
        let results = ["/home/u/docs/a.txt", "/home/u/docs/b.txt"];
        let items = generate_result_items(&prefs(false, AltEnterAction::OpenPath), &results);
        assert_eq!(labels(&items), results.to_vec());
    }

    #[test]
    fn test_single_result_is_not_trimmed() {
        let results = ["/home/u/docs/a.txt"];
        let items = generate_result_items(&prefs(true, AltEnterAction::OpenPath), &results);
        assert_eq!(labels(&items), vec!["/home/u/docs/a.txt"]);
    }

    #[test]
    fn test_no_trim_when_prefix_is_root() {
        assert_eq!(path_prefix(&["/a/x.txt", "/b/y.txt"], true), None);
        assert_eq!(path_prefix(&["/a/x.txt", "/a/y.txt"], true), None);
        assert_eq!(path_prefix(&["a.txt", "b.txt"], true), None);
    }

    #[test]
    fn test_prefix_for_mixed_depths() {
        let results = ["/home/u/a.txt", "/home/u/sub/c.txt"];
        assert_eq!(path_prefix(&results, true), Some("/home".to_string()));
        let items = generate_result_items(&prefs(true, AltEnterAction::OpenPath), &results);
        assert_eq!(labels(&items), vec![".../u/a.txt", ".../u/sub/c.txt"]);
    }

    #[test]
    fn test_trimming_is_idempotent() {
        let results = ["/srv/data/x/1.csv", "/srv/data/x/2.csv", "/srv/data/y.csv"];
        let preferences = prefs(true, AltEnterAction::OpenPath);
        let first = generate_result_items(&preferences, &results);
        let second = generate_result_items(&preferences, &results);
        assert_eq!(first, second);

        let targets: Vec<&str> = first.iter().map(|item| item.target_path.as_str()).collect();
        assert_eq!(targets, results.to_vec());
        let again = generate_result_items(&preferences, &targets);
        assert_eq!(labels(&again), labels(&first));
        assert_eq!(labels(&first), vec![".../data/x/1.csv", ".../data/x/2.csv", ".../data/y.csv"]);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("/home/u/a", Some("/home")), ".../u/a");
        assert_eq!(display_name("/srv/a", Some("/home")), "/srv/a");
        assert_eq!(display_name("/srv/a", None), "/srv/a");
    }

    #[test]
    fn test_copy_path_copies_verbatim() {
        let results = ["/home/u/a.txt"];
        let items = generate_result_items(&prefs(false, AltEnterAction::CopyPath), &results);
        assert_eq!(items[0].primary_action, Action::open("/home/u/a.txt"));
        assert_eq!(
            items[0].secondary_action,
            Action::copy_to_clipboard("/home/u/a.txt")
        );
    }

    #[test]
    fn test_open_path_opens_parent_of_file() {
        let results = ["/home/u/a.txt"];
        let items = generate_result_items(&prefs(false, AltEnterAction::OpenPath), &results);
        assert_eq!(items[0].secondary_action, Action::open("/home/u"));
    }

    #[test]
    fn test_open_path_opens_directory_itself() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().display().to_string();
        assert_eq!(alt_enter_action(AltEnterAction::OpenPath, &path), Action::open(&path));
    }

    #[test]
    fn test_dirname_of_bare_name() {
        assert_eq!(dirname("no-such-file-here.txt"), ".");
    }

    #[test]
    fn test_result_item_from_presented() {
        let item: ResultItem = generate_result_items(
            &prefs(false, AltEnterAction::CopyPath),
            &["/home/u/a.txt"],
        )
        .remove(0)
        .into();

        assert_eq!(item.kind, ItemKind::SmallResult);
        assert_eq!(item.icon, RESULT_ICON);
        assert_eq!(item.name, "/home/u/a.txt");
        assert!(!item.is_inert());
    }

    #[test]
    fn test_no_op_result_items() {
        let items = no_op_result_items(&["one", "two"], ERROR_ICON);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(ResultItem::is_inert));
        assert!(items.iter().all(|item| item.icon == ERROR_ICON));
        assert_eq!(items[1].name, "two");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ResultItem::from(PresentedItem {
            display_label: ".../a".to_string(),
            target_path: "/x/a".to_string(),
            primary_action: Action::open("/x/a"),
            secondary_action: Action::copy_to_clipboard("/x/a"),
        }))
        .unwrap();

        assert_eq!(json["kind"], "small_result");
        assert_eq!(json["on_enter"]["type"], "open");
        assert_eq!(json["on_enter"]["path"], "/x/a");
        assert_eq!(json["on_alt_enter"]["type"], "copy_to_clipboard");

        let inert = serde_json::to_value(ResultItem::inert("msg", ICON)).unwrap();
        assert_eq!(inert["kind"], "result");
        assert_eq!(inert["on_enter"]["type"], "do_nothing");
        assert!(inert["on_alt_enter"].is_null());
    }
}
