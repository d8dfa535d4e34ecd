use flipbook_async_runtime::{SessionId, ViewerCommand, ViewerUpdate};
use std::collections::VecDeque;
use tokio::sync::mpsc;

use crate::{handlers, viewer};

/// Async worker task that processes viewer commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<ViewerCommand>,
    update_tx: mpsc::UnboundedSender<ViewerUpdate>,
) {
    let mut state = viewer::ViewerState::new();
    let mut pending = VecDeque::new();

    loop {
        if pending.is_empty() {
            match command_rx.recv().await {
                Some(cmd) => enqueue(&mut pending, cmd),
                None => break,
            }
        }

        // Pull in everything queued so stale fetches can be dropped first
        while let Ok(cmd) = command_rx.try_recv() {
            enqueue(&mut pending, cmd);
        }

        if let Some(cmd) = pending.pop_front() {
            process_command(cmd, &mut state, &update_tx).await;
        }
    }

    log::debug!("Viewer worker stopped");
}

/// Queue a command. `Retain` and `CloseSession` prune fetches that are
/// no longer wanted instead of waiting their turn.
fn enqueue(pending: &mut VecDeque<ViewerCommand>, cmd: ViewerCommand) {
    match cmd {
        ViewerCommand::Retain { session, resident } => {
            let before = pending.len();
            pending.retain(|queued| match queued {
                ViewerCommand::FetchPage {
                    session: queued_session,
                    index,
                    ..
                } => *queued_session != session || resident.contains(index),
                _ => true,
            });
            let dropped = before - pending.len();
            if dropped > 0 {
                log::debug!("Discarding {} queued fetches outside the window", dropped);
            }
        }
        ViewerCommand::CloseSession { session } => {
            drop_session_fetches(pending, session);
            pending.push_back(ViewerCommand::CloseSession { session });
        }
        cmd => pending.push_back(cmd),
    }
}

fn drop_session_fetches(pending: &mut VecDeque<ViewerCommand>, session: SessionId) {
    pending.retain(|queued| {
        !matches!(
            queued,
            ViewerCommand::FetchPage { session: queued_session, .. } if *queued_session == session
        )
    });
}

async fn process_command(
    cmd: ViewerCommand,
    state: &mut viewer::ViewerState,
    update_tx: &mpsc::UnboundedSender<ViewerUpdate>,
) {
    match cmd {
        ViewerCommand::OpenCatalog { config } => {
            handlers::catalog::handle_open_catalog(config, state, update_tx).await;
        }
        ViewerCommand::FetchPage {
            session,
            index,
            page,
        } => {
            handlers::pages::handle_fetch_page(session, index, page, state, update_tx).await;
        }
        ViewerCommand::Retain { .. } => {
            // Applied while queueing
        }
        ViewerCommand::CloseSession { session } => {
            handlers::catalog::handle_close(session, state, update_tx).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipbook_async_runtime::PageId;

    fn fetch(session: u64, index: usize) -> ViewerCommand {
        ViewerCommand::FetchPage {
            session: SessionId(session),
            index,
            page: PageId::from(format!("page_{index:02}.jpg")),
        }
    }

    fn queued_indices(pending: &VecDeque<ViewerCommand>) -> Vec<(u64, usize)> {
        pending
            .iter()
            .filter_map(|cmd| match cmd {
                ViewerCommand::FetchPage { session, index, .. } => Some((session.0, *index)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn retain_drops_fetches_outside_window() {
        let mut pending = VecDeque::new();
        for index in 0..5 {
            enqueue(&mut pending, fetch(0, index));
        }
        enqueue(&mut pending, fetch(1, 0));

        enqueue(
            &mut pending,
            ViewerCommand::Retain {
                session: SessionId(0),
                resident: vec![3, 4, 5],
            },
        );

        assert_eq!(queued_indices(&pending), vec![(0, 3), (0, 4), (1, 0)]);
    }

    #[test]
    fn close_drops_session_fetches() {
        let mut pending = VecDeque::new();
        enqueue(&mut pending, fetch(0, 0));
        enqueue(&mut pending, fetch(1, 0));
        enqueue(
            &mut pending,
            ViewerCommand::CloseSession {
                session: SessionId(0),
            },
        );

        assert_eq!(queued_indices(&pending), vec![(1, 0)]);
        assert!(matches!(
            pending.back(),
            Some(ViewerCommand::CloseSession { session }) if *session == SessionId(0)
        ));
    }
}
