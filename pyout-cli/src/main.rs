//! PyOut CLI - Terminal scratchpad with live inline Python output

mod config;
mod io;
mod link;
mod ui;

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use pyout_core::{App, Executor, Mode, SideEffect};

/// Event-loop tick; debounce deadlines and worker completions are polled at
/// this rate
const TICK: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let file_path = args.get(1);

    let mut cfg = config::Config::load();
    let scratch_dir = io::pyout_dir()?.join("scratch");
    let executor = Executor::new(cfg.interpreter.clone(), scratch_dir);
    let mut app = App::new(executor, cfg.theme());

    if let Some(path) = file_path {
        match io::load_file(path) {
            Ok(doc) => {
                app.load_document(doc);
                app.set_status(&format!("Loaded {}", path));
            }
            Err(e) => {
                app.set_status(&format!("Error: {}", e));
            }
        }
    } else {
        app.set_status("Scratch buffer. Pass a file path to load one.");
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut cfg);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    cfg: &mut config::Config,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, cfg, key.code, key.modifiers);
            }
        }

        if let Some(effect) = app.tick(Instant::now()) {
            match effect {
                SideEffect::OpenUrl(url) => match link::open_external(&url) {
                    Ok(()) => app.set_status("Taking a break..."),
                    Err(e) => app.set_status(&format!("Error: {}", e)),
                },
            }
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, cfg: &mut config::Config, code: KeyCode, modifiers: KeyModifiers) {
    // A visible notice swallows the next key
    if app.notice.take().is_some() {
        return;
    }
    app.clear_status();

    match app.mode {
        Mode::Normal => handle_normal_mode(app, code, modifiers),
        Mode::Insert => handle_insert_mode(app, code),
        Mode::Visual => handle_visual_mode(app, code),
        Mode::ThemePicker => handle_theme_picker(app, cfg, code),
        Mode::Help => {
            app.mode = Mode::Normal;
        }
    }
}

fn handle_normal_mode(app: &mut App, code: KeyCode, _modifiers: KeyModifiers) {
    match code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('?') => app.mode = Mode::Help,
        KeyCode::Char('i') => app.mode = Mode::Insert,
        KeyCode::Char('v') => {
            app.enter_visual_mode();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('t') => app.open_theme_picker(),

        // Navigation
        KeyCode::Char('j') | KeyCode::Down => {
            app.buffer.move_down();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.buffer.move_up();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('h') | KeyCode::Left => {
            app.buffer.move_left();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.buffer.move_right();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('0') | KeyCode::Home => {
            app.buffer.move_to_line_start();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('$') | KeyCode::End => {
            app.buffer.move_to_line_end();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('g') => {
            app.buffer.move_to_top();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('G') => {
            app.buffer.move_to_bottom();
            app.note_selection(Instant::now());
        }

        // Save
        KeyCode::Char('s') => {
            let saved = app.sync_document().map(|doc| io::save_document(doc));
            match saved {
                Some(Ok(path)) => app.set_status(&format!("Saved {}", path.display())),
                Some(Err(e)) => app.set_status(&format!("Error: {}", e)),
                None => app.set_status("No file to save. Start with: pyout <file.py>"),
            }
        }

        _ => {}
    }
}

fn handle_insert_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Enter => {
            app.buffer.insert_newline();
            app.note_edit(Instant::now());
        }
        KeyCode::Backspace => {
            app.buffer.backspace();
            app.note_edit(Instant::now());
        }
        KeyCode::Delete => {
            app.buffer.delete_forward();
            app.note_edit(Instant::now());
        }
        KeyCode::Tab => {
            app.buffer.insert_str("    ");
            app.note_edit(Instant::now());
        }
        KeyCode::Char(c) => {
            app.buffer.insert_char(c);
            app.note_edit(Instant::now());
        }
        KeyCode::Down => {
            app.buffer.move_down();
            app.note_selection(Instant::now());
        }
        KeyCode::Up => {
            app.buffer.move_up();
            app.note_selection(Instant::now());
        }
        KeyCode::Left => {
            app.buffer.move_left();
            app.note_selection(Instant::now());
        }
        KeyCode::Right => {
            app.buffer.move_right();
            app.note_selection(Instant::now());
        }
        _ => {}
    }
}

fn handle_visual_mode(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('v') => app.exit_visual_mode(),
        KeyCode::Char('j') | KeyCode::Down => {
            app.buffer.move_down();
            app.note_selection(Instant::now());
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.buffer.move_up();
            app.note_selection(Instant::now());
        }
        _ => {}
    }
}

fn handle_theme_picker(app: &mut App, cfg: &mut config::Config, code: KeyCode) {
    match code {
        KeyCode::Esc => app.mode = Mode::Normal,
        KeyCode::Char('j') | KeyCode::Down => app.picker_next(),
        KeyCode::Char('k') | KeyCode::Up => app.picker_prev(),
        KeyCode::Enter => confirm_theme(app, cfg),
        // Quick select
        KeyCode::Char(c @ '1'..='6') => {
            app.theme_selected = c as usize - '1' as usize;
            confirm_theme(app, cfg);
        }
        _ => {}
    }
}

fn confirm_theme(app: &mut App, cfg: &mut config::Config) {
    let theme = app.confirm_theme();
    cfg.theme = theme.as_str().to_string();
    if let Err(e) = cfg.save() {
        app.set_status(&format!("Error: {}", e));
    }
}
