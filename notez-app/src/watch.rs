//! Live mode: follow a note file and re-process it as it is edited.
//!
//! File events feed two [`Debouncer`]s. The processing debouncer spawns a
//! pass once edits pause; the autosave debouncer writes the draft to the
//! store. Passes run concurrently and report back with their [`Ticket`], so
//! only the newest result is printed.
//!
//! The containing directory is watched rather than the file itself, so an
//! editor that saves by renaming a temporary file over the note keeps being
//! followed.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use notez_core::{Mode, NoteStore};

use crate::debounce::Debouncer;
use crate::error::Result;
use crate::organizer::{Organizer, Outcome};
use crate::session::{NoteSession, Ticket};

/// Longest sleep between loop wakeups while nothing is pending.
const IDLE_WAKE: Duration = Duration::from_secs(1);

/// Output options for live mode.
#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Mode toggle for every pass.
    pub mode: Mode,
    /// Print HTML instead of markdown for organized notes.
    pub html: bool,
}

/// Follow `path` until Ctrl-C.
///
/// An empty or missing file is seeded from the stored draft, if any.
///
/// # Errors
///
/// Returns an error if the watcher cannot be installed or the draft cannot
/// be written to the store.
pub async fn watch_file(path: &Path, organizer: Arc<Organizer>, store: &NoteStore, options: WatchOptions) -> Result<()> {
    let mut text = restore_draft(path, store)?;

    let (event_tx, mut events) = mpsc::unbounded_channel();
    let (_watcher, file_name) = watch_note_dir(path, event_tx)?;
    info!(path = %path.display(), "Watching note");

    let (done_tx, mut done) = mpsc::unbounded_channel::<(Ticket, Option<Outcome>)>();
    let session = Arc::new(NoteSession::new());
    let mut processing = Debouncer::from_millis(organizer.config().processing.debounce_ms);
    let mut autosave = Debouncer::from_millis(organizer.config().processing.autosave_ms);

    spawn_pass(&organizer, &session, &text, options.mode, &done_tx);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(event) = events.recv() => match event {
                Ok(event) if is_note_edit(&event, &file_name) => {
                    match std::fs::read_to_string(path) {
                        Ok(updated) if updated != text => {
                            text = updated;
                            let now = Instant::now();
                            processing.touch(now);
                            autosave.touch(now);
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "Could not read note"),
                    }
                }
                Ok(event) if matches!(event.kind, EventKind::Remove(_)) && mentions_note(&event.paths, &file_name) => {
                    debug!("Note removed; waiting for it to reappear");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Watcher error"),
            },
            Some((ticket, outcome)) = done.recv() => {
                let note = outcome.map(|o| {
                    debug!(source = ?o.source, mode = %o.mode, "Pass finished");
                    o.note
                });
                if session.complete(ticket, note) {
                    if let Some(current) = session.current() {
                        let shown = if options.html { current.content() } else { current.source() };
                        println!("\n--- {} ---\n{shown}", current.mode());
                    }
                }
            }
            () = tokio::time::sleep(next_wake(&[&processing, &autosave], Instant::now())) => {
                let now = Instant::now();
                if processing.fire(now) {
                    spawn_pass(&organizer, &session, &text, options.mode, &done_tx);
                }
                if autosave.fire(now) {
                    store.save_draft(&text)?;
                    debug!("Draft autosaved");
                }
            }
            _ = &mut shutdown => break,
        }
    }

    if processing.is_pending() {
        debug!("Stopping with an unprocessed edit");
    }
    if autosave.flush() {
        store.save_draft(&text)?;
    }
    info!("Stopped watching");
    Ok(())
}

/// Install a watcher on the directory holding `path`.
///
/// Returns the watcher, which must be kept alive, and the note's file name
/// for filtering the directory's events.
fn watch_note_dir(
    path: &Path,
    events: mpsc::UnboundedSender<notify::Result<Event>>,
) -> Result<(RecommendedWatcher, OsString)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().map(OsStr::to_os_string).unwrap_or_default();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let _ = events.send(res);
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, file_name))
}

/// Whether `event` may have changed the note's contents.
///
/// Creation, writes and a rename onto the note count. A rename away from
/// the note does not.
fn is_note_edit(event: &Event, file_name: &OsStr) -> bool {
    match event.kind {
        EventKind::Create(_) => mentions_note(&event.paths, file_name),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => false,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            event.paths.last().is_some_and(|p| p.file_name() == Some(file_name))
        }
        EventKind::Modify(_) => mentions_note(&event.paths, file_name),
        _ => false,
    }
}

fn mentions_note(paths: &[PathBuf], file_name: &OsStr) -> bool {
    paths.iter().any(|p| p.file_name() == Some(file_name))
}

/// Sleep until the earliest pending debouncer is due.
fn next_wake(timers: &[&Debouncer], now: Instant) -> Duration {
    timers
        .iter()
        .filter_map(|d| d.remaining(now))
        .min()
        .unwrap_or(IDLE_WAKE)
        .min(IDLE_WAKE)
}

fn restore_draft(path: &Path, store: &NoteStore) -> Result<String> {
    let current = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if !current.trim().is_empty() {
        return Ok(current);
    }
    let draft = store.draft()?.unwrap_or_default();
    std::fs::write(path, &draft)?;
    if !draft.is_empty() {
        info!(path = %path.display(), chars = draft.chars().count(), "Restored draft");
    }
    Ok(draft)
}

fn spawn_pass(
    organizer: &Arc<Organizer>,
    session: &NoteSession,
    text: &str,
    mode: Mode,
    done: &mpsc::UnboundedSender<(Ticket, Option<Outcome>)>,
) {
    let Some(ticket) = session.begin(text, false) else {
        return;
    };
    let organizer = Arc::clone(organizer);
    let text = text.to_string();
    let done = done.clone();
    tokio::spawn(async move {
        let outcome = organizer.process(&text, mode).await;
        let _ = done.send((ticket, outcome));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_seeded_from_draft() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.txt");
        let store = NoteStore::open_in_memory().expect("store");
        store.save_draft("meeting with design team").expect("save");

        let text = restore_draft(&path, &store).expect("restore");
        assert_eq!(text, "meeting with design team");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), text);
    }

    #[test]
    fn existing_text_is_kept() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "already here").expect("write");
        let store = NoteStore::open_in_memory().expect("store");
        store.save_draft("older draft").expect("save");

        assert_eq!(restore_draft(&path, &store).expect("restore"), "already here");
    }

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        paths.iter().fold(Event::new(kind), |e, p| e.add_path(PathBuf::from(p)))
    }

    #[test]
    fn only_edits_to_the_note_count() {
        let name = OsStr::new("note.txt");
        let write = EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Content));
        assert!(is_note_edit(&event(write, &["/notes/note.txt"]), name));
        assert!(!is_note_edit(&event(write, &["/notes/other.txt"]), name));
        assert!(is_note_edit(
            &event(EventKind::Create(notify::event::CreateKind::File), &["/notes/note.txt"]),
            name
        ));
        assert!(!is_note_edit(
            &event(EventKind::Remove(notify::event::RemoveKind::File), &["/notes/note.txt"]),
            name
        ));
    }

    #[test]
    fn rename_onto_the_note_is_an_edit() {
        let name = OsStr::new("note.txt");
        let both = EventKind::Modify(ModifyKind::Name(RenameMode::Both));
        assert!(is_note_edit(&event(both, &["/notes/.note.txt.swp", "/notes/note.txt"]), name));
        assert!(!is_note_edit(&event(both, &["/notes/note.txt", "/notes/note.txt.bak"]), name));

        let to = EventKind::Modify(ModifyKind::Name(RenameMode::To));
        assert!(is_note_edit(&event(to, &["/notes/note.txt"]), name));
        let from = EventKind::Modify(ModifyKind::Name(RenameMode::From));
        assert!(!is_note_edit(&event(from, &["/notes/note.txt"]), name));
    }

    #[tokio::test]
    async fn note_is_followed_after_rename_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "first draft").expect("write");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let (_watcher, name) = watch_note_dir(&path, tx).expect("watch");

        for round in 0..2 {
            let scratch = dir.path().join(format!(".note.txt.{round}"));
            std::fs::write(&scratch, format!("saved {round}")).expect("write scratch");
            std::fs::rename(&scratch, &path).expect("rename");

            let seen = tokio::time::timeout(Duration::from_secs(5), async {
                while let Some(res) = rx.recv().await {
                    if res.is_ok_and(|e| is_note_edit(&e, &name)) {
                        return true;
                    }
                }
                false
            })
            .await
            .expect("edit event");
            assert!(seen, "round {round}");
            assert_eq!(std::fs::read_to_string(&path).expect("read"), format!("saved {round}"));
        }
    }

    #[test]
    fn loop_wakes_for_the_earliest_timer() {
        let now = Instant::now();
        let mut processing = Debouncer::from_millis(300);
        let autosave = Debouncer::from_millis(3000);
        assert_eq!(next_wake(&[&processing, &autosave], now), IDLE_WAKE);

        processing.touch(now);
        assert_eq!(
            next_wake(&[&processing, &autosave], now + Duration::from_millis(100)),
            Duration::from_millis(200)
        );
    }
}
