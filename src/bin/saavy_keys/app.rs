//! Event loop: terminal input in, key events to the keyboard, frames out.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use ratatui::DefaultTerminal;
use rtrb::Consumer;
use tracing::{debug, info};

use saavy_keys::{
    engine::{AudioBackend, ContextState},
    input::InputEvent,
    keys::input_code_for_char,
    Keyboard, KeyboardConfig,
};

use crate::{
    audio::StreamBackend,
    ui::{self, KeyboardLayout, SpectrumAnalyzer, StatusLine, View},
};

/// Scope length, also the FFT size.
pub const VIS_BUFFER_SIZE: usize = 2048;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    keyboard: Keyboard<StreamBackend>,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    layout: Option<KeyboardLayout>,
    /// Key under the mouse while the left button is down.
    hovered: Option<&'static str>,
    /// Last press or repeat per held key, for terminals without release events.
    held: HashMap<String, Instant>,
    release_events: bool,
    hold: Duration,
    release_tail: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(backend: StreamBackend, scope_rx: Consumer<f32>, config: &KeyboardConfig) -> Self {
        let spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, backend.sample_rate());
        Self {
            keyboard: Keyboard::new(backend, config),
            scope_rx,
            scope: vec![0.0; VIS_BUFFER_SIZE],
            spectrum,
            layout: None,
            hovered: None,
            held: HashMap::new(),
            release_events: false,
            hold: Duration::from_millis(config.key_hold_ms),
            release_tail: Duration::from_secs_f64(config.envelope.release),
            should_quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut stdout = std::io::stdout();
        execute!(stdout, EnableMouseCapture)?;

        self.release_events = supports_keyboard_enhancement().unwrap_or(false);
        if self.release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        info!(release_events = self.release_events, "terminal input ready");

        let result = self.event_loop(terminal);

        if self.release_events {
            execute!(stdout, PopKeyboardEnhancementFlags)?;
        }
        execute!(stdout, DisableMouseCapture)?;

        // Let the release tails ring out before the stream is dropped
        let backend = self.keyboard.shutdown();
        if backend.state() == ContextState::Running {
            std::thread::sleep(self.release_tail);
        }
        drop(backend);

        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.release_stale_keys(Instant::now());

            terminal.draw(|frame| {
                let backend = self.keyboard.backend();
                let view = View {
                    keys: self.keyboard.index().keys(),
                    visuals: self.keyboard.visuals(),
                    status: StatusLine {
                        waveform: self.keyboard.waveform(),
                        active_voices: self.keyboard.voices().len(),
                        background: self.keyboard.visuals().background(),
                        sample_rate: backend.sample_rate(),
                        channels: backend.channels(),
                        running: backend.state() == ContextState::Running,
                    },
                    scope: &self.scope,
                    master_gain: self.keyboard.master_gain(),
                    spectrum: self.spectrum.data(),
                };
                self.layout = Some(ui::render(frame, &view));
            })?;

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn poll_scope(&mut self) {
        let mut received = false;
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
            received = true;
        }

        if received {
            if self.scope.len() > VIS_BUFFER_SIZE {
                let excess = self.scope.len() - VIS_BUFFER_SIZE;
                self.scope.drain(0..excess);
            }
            self.spectrum.update(&self.scope);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Press {
            match key.code {
                KeyCode::Esc => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Tab | KeyCode::Right => {
                    let next = self.keyboard.waveform().next();
                    self.keyboard.set_waveform(next);
                    return;
                }
                KeyCode::BackTab | KeyCode::Left => {
                    let previous = self.keyboard.waveform().previous();
                    self.keyboard.set_waveform(previous);
                    return;
                }
                _ => {}
            }
        }

        let KeyCode::Char(c) = key.code else {
            return;
        };
        let Some(code) = input_code_for_char(c) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.held.insert(code.clone(), Instant::now());
                self.keyboard.handle(InputEvent::KeyDown(code));
            }
            KeyEventKind::Release => {
                self.held.remove(&code);
                self.keyboard.handle(InputEvent::KeyUp(code));
            }
        }
    }

    /// Without release events a key counts as held while the terminal keeps
    /// sending auto-repeat for it.
    fn release_stale_keys(&mut self, now: Instant) {
        if self.release_events {
            return;
        }

        let hold = self.hold;
        let stale: Vec<String> = self
            .held
            .iter()
            .filter(|(_, last)| now.duration_since(**last) >= hold)
            .map(|(code, _)| code.clone())
            .collect();

        for code in stale {
            self.held.remove(&code);
            debug!(input_code = %code, "key released after hold timeout");
            self.keyboard.handle(InputEvent::KeyUp(code));
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let under = self
            .layout
            .as_ref()
            .and_then(|layout| layout.key_at(mouse.column, mouse.row))
            .map(|def| def.input_code);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.hovered = under;
                if let Some(code) = under {
                    self.keyboard.handle(InputEvent::PointerDown(code.to_string()));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if self.hovered != under {
                    if let Some(left) = self.hovered.take() {
                        self.keyboard.handle(InputEvent::PointerLeave(left.to_string()));
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.hovered = None;
                if let Some(code) = under {
                    self.keyboard.handle(InputEvent::PointerUp(code.to_string()));
                }
            }
            _ => {}
        }
    }
}
