use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{env, fs, io::stdout, path::Path, process};
use text_mask_config::Config;
use text_mask_engine::{MaskOptions, MaskedInput};

/// One masked field plus the raw text and caret a real widget would own.
struct App {
    title: String,
    field: MaskedInput,
    text: String,
    caret: usize,
    status: Option<String>,
}

impl App {
    fn new(title: String, mask: &str, options: MaskOptions) -> Result<Self> {
        let field = MaskedInput::new(mask, options)?;
        Ok(Self {
            title,
            field,
            text: String::new(),
            caret: 0,
            status: None,
        })
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, caret: usize) -> usize {
        self.text
            .char_indices()
            .nth(caret)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn insert(&mut self, s: &str) {
        let at = self.byte_offset(self.caret);
        self.text.insert_str(at, s);
        self.caret += s.chars().count();
        self.sync();
    }

    fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        let at = self.byte_offset(self.caret - 1);
        self.text.remove(at);
        self.caret -= 1;
        self.sync();
    }

    fn delete(&mut self) {
        if self.caret >= self.char_count() {
            return;
        }
        let at = self.byte_offset(self.caret);
        self.text.remove(at);
        self.sync();
    }

    fn move_left(&mut self) {
        self.caret = self.caret.saturating_sub(1);
    }

    fn move_right(&mut self) {
        self.caret = (self.caret + 1).min(self.char_count());
    }

    fn move_home(&mut self) {
        self.caret = 0;
    }

    fn move_end(&mut self) {
        self.caret = self.char_count();
    }

    /// Hands the raw text to the field and writes the patch back.
    fn sync(&mut self) {
        match self.field.update(self.text.as_str(), self.caret) {
            Ok(Some(patch)) => {
                log::debug!("patch v{}: {:?} caret {}", patch.version, patch.value, patch.caret);
                self.text = patch.value;
                self.caret = patch.caret;
                self.status = None;
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("update failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [MASK | --preset NAME]");
    eprintln!("Mask tokens: 1 digit, A letter, ? letter or digit, U upper, L lower, * any, \\ escape");
    process::exit(1);
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    init_logging(config.log_file.as_deref())?;
    log::info!("starting with config from {}", config_path.display());

    let (title, mask) = match args.as_slice() {
        [_] => match config.default_mask() {
            Some((name, mask)) => (name.to_string(), mask.to_string()),
            None => {
                eprintln!("Error: No mask given and no presets configured");
                eprintln!("Add presets to {}", config_path.display());
                usage(&args[0]);
            }
        },
        [_, flag, name] if flag == "--preset" => match config.preset(name) {
            Some(mask) => (name.clone(), mask.to_string()),
            None => {
                let known: Vec<&str> = config.presets.keys().map(String::as_str).collect();
                eprintln!("Error: Unknown preset '{name}'. Known presets: {}", known.join(", "));
                process::exit(1);
            }
        },
        [_, mask] if !mask.starts_with("--") => ("custom".to_string(), mask.clone()),
        _ => usage(&args[0]),
    };

    let mut app = match App::new(title, &mask, config.mask_options()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    println!("{}", app.field.value());
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char(c) => app.insert(&c.to_string()),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Delete => app.delete(),
                KeyCode::Left => app.move_left(),
                KeyCode::Right => app.move_right(),
                KeyCode::Home => app.move_home(),
                KeyCode::End => app.move_end(),
                _ => {}
            },
            Event::Paste(text) => app.insert(&text),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    // Field: show the placeholder as a dim hint while empty
    let field_line = if app.text.is_empty() {
        Line::from(Span::styled(
            app.field.placeholder().to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::raw(app.text.clone()))
    };
    let field = Paragraph::new(field_line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} {}", app.title, app.field.mask())),
    );
    f.render_widget(field, chunks[0]);

    let caret_x = u16::try_from(app.caret)
        .unwrap_or(u16::MAX)
        .saturating_add(chunks[0].x + 1);
    f.set_cursor_position((caret_x, chunks[0].y + 1));

    // Field state
    let label = Style::default().add_modifier(Modifier::BOLD);
    let mut details = vec![
        Line::from(vec![
            Span::styled("placeholder: ", label),
            Span::raw(app.field.placeholder().to_string()),
        ]),
        Line::from(vec![
            Span::styled("value:       ", label),
            Span::raw(format!("{:?}", app.field.value())),
        ]),
        Line::from(vec![
            Span::styled("caret:       ", label),
            Span::raw(app.caret.to_string()),
        ]),
        Line::from(vec![
            Span::styled("version:     ", label),
            Span::raw(app.field.version().to_string()),
        ]),
    ];
    if let Some(status) = &app.status {
        details.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    let state = Paragraph::new(details).block(Block::default().borders(Borders::ALL).title("State"));
    f.render_widget(state, chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("Esc: Quit | "),
        Span::raw("←/→/Home/End: Move | "),
        Span::raw("Backspace/Delete: Erase | "),
        Span::raw("Paste supported"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[2]);
}
