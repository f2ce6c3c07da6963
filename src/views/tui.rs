use std::io;
use ratatui::{
    widgets::{Block, Borders, List, ListItem},
    layout::{Layout, Constraint, Direction},
    style::{Style, Color, Modifier},
    Terminal, Frame,
    text::Line,
    prelude::Span,
};
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    execute,
    event::{DisableMouseCapture, EnableMouseCapture},
};

use crate::models::Post;
use crate::views::widgets::StatefulList;

pub fn setup_terminal() -> io::Result<Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

pub fn restore_terminal(terminal: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

pub fn render_ui<B: ratatui::backend::Backend>(
    f: &mut Frame<B>,
    stateful_list: &mut StatefulList<Post>,
    status: String,
) {
    // Create the layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Percentage(100)].as_ref())
        .split(f.size());

    // Create the feed of posts
    let items: Vec<ListItem> = stateful_list.items
        .iter()
        .map(|post| {
            // Header line with author and timestamp
            let header = Line::from(vec![
                Span::styled(
                    format!("{} posted at {}", post.author.display_name(), post.datetime),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                )
            ]);

            let heart = if post.has_liked { "♥" } else { "♡" };
            let counts = Line::from(vec![
                Span::styled(
                    format!("{} {}", heart, post.like_count),
                    if post.has_liked {
                        Style::default().fg(Color::Red)
                    } else {
                        Style::default()
                    },
                ),
                Span::raw(format!("   {} comments", post.comments.len())),
            ]);

            let mut all_lines = vec![
                header,
                Line::from(""), // Empty line for spacing
            ];
            all_lines.push(Line::from(Span::raw(post.content.clone())));
            all_lines.push(counts);
            for comment in &post.comments {
                all_lines.push(Line::from(vec![
                    Span::styled(
                        format!("    {}: ", comment.author.display_name()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw(comment.content.clone()),
                ]));
            }
            all_lines.push(Line::from(""));

            ListItem::new(all_lines)
                .style(Style::default())
        })
        .collect();

    // Create a List from the items and highlight the currently selected one
    let list = List::new(items)
        .block(Block::default().title(status).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Gray)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        );

    // Render the list with its state
    f.render_stateful_widget(list, chunks[0], &mut stateful_list.state);
}
