use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use crate::controllers::feed_controller::{compose_via_editor, FeedEngine};
use crate::error::FeedtuiError;
use crate::models::client::FeedTransport;
use crate::views::{tui, StatefulList};

pub async fn start_app<T: FeedTransport + 'static>(
    engine: FeedEngine<T>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    let mut terminal = tui::setup_terminal()?;

    let posts = engine.posts().await;
    let mut stateful_list = StatefulList::with_items(posts);

    // Run the app
    let res = run_app(&mut terminal, &mut stateful_list, engine).await;

    // Restore terminal
    tui::restore_terminal(&mut terminal)?;

    if let Err(err) = res {
        eprintln!("{:?}", err);
    }

    Ok(())
}

pub async fn run_app<T: FeedTransport + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    stateful_list: &mut StatefulList<crate::models::Post>,
    engine: FeedEngine<T>,
) -> Result<(), FeedtuiError> {
    // Status line shared with spawned mutations so their failures surface
    // in the list title.
    let notice: Arc<Mutex<String>> = Arc::new(Mutex::new(String::from("Feed")));

    loop {
        // Spawned likes land in the shared store; pick them up each frame.
        stateful_list.set_items(engine.posts().await);
        let title = notice.lock().await.clone();
        terminal.draw(|f| tui::render_ui(f, stateful_list, title))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => stateful_list.next(),
                KeyCode::Up | KeyCode::Char('k') => stateful_list.previous(),
                KeyCode::Char('g') => stateful_list.first(),
                KeyCode::Char('G') => stateful_list.last(),
                KeyCode::Char('r') => {
                    terminal.draw(|f| {
                        tui::render_ui(f, stateful_list, String::from("Refreshing..."))
                    })?;
                    match engine.reconcile().await {
                        Ok(()) => *notice.lock().await = String::from("Feed"),
                        Err(e) => {
                            *notice.lock().await = format!("Could not refresh the feed: {}", e);
                        }
                    }
                }
                KeyCode::Char('l') => {
                    if let Some(post) = stateful_list.selected() {
                        let post_id = post.id.clone();
                        let engine = engine.clone();
                        let notice = Arc::clone(&notice);
                        tokio::spawn(async move {
                            match engine.toggle_like(&post_id).await {
                                Ok(_) => *notice.lock().await = String::from("Feed"),
                                Err(e) => {
                                    *notice.lock().await =
                                        format!("Could not like post: {}", e);
                                }
                            }
                        });
                    }
                }
                KeyCode::Char('n') => {
                    tui::restore_terminal(terminal)?;
                    let draft = compose_via_editor();
                    *terminal = tui::setup_terminal()?;
                    match draft {
                        Ok(content) if !content.trim().is_empty() => {
                            terminal.draw(|f| {
                                tui::render_ui(f, stateful_list, String::from("Posting..."))
                            })?;
                            if let Err(e) = engine.create_post(content.trim()).await {
                                *notice.lock().await =
                                    format!("Could not publish post: {}", e);
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            *notice.lock().await = format!("Could not open editor: {}", e);
                        }
                    }
                }
                KeyCode::Char('c') => {
                    let selected = stateful_list.selected().map(|p| p.id.clone());
                    if let Some(post_id) = selected {
                        tui::restore_terminal(terminal)?;
                        let draft = compose_via_editor();
                        *terminal = tui::setup_terminal()?;
                        match draft {
                            Ok(content) if !content.trim().is_empty() => {
                                if let Err(e) =
                                    engine.create_comment(&post_id, content.trim()).await
                                {
                                    *notice.lock().await =
                                        format!("Could not add comment: {}", e);
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                *notice.lock().await =
                                    format!("Could not open editor: {}", e);
                            }
                        }
                    }
                }
                KeyCode::Char('d') => {
                    let selected = stateful_list
                        .selected()
                        .filter(|p| p.can_delete)
                        .map(|p| p.id.clone());
                    if let Some(post_id) = selected {
                        terminal.draw(|f| {
                            tui::render_ui(f, stateful_list, String::from("Deleting..."))
                        })?;
                        if let Err(e) = engine.delete_post(&post_id).await {
                            *notice.lock().await = format!("Could not delete post: {}", e);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
