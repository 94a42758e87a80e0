//! Frog Crossing terminal front-end
//!
//! Runs the session in a crossterm alternate screen. The logical 1024x768
//! screen is sampled onto a 64x20 cell grid (16x40 px per cell, one tile row
//! per terminal row); only changed cells are redrawn each frame.

use std::fs::File;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use glam::Vec2;

use frog_crossing::assets::{AssetCache, AssetProvider, ImageId, SoundId, paths};
use frog_crossing::audio::{AudioBackend, AudioManager};
use frog_crossing::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use frog_crossing::persistence::{JsonFileStore, MemoryStore, Storage};
use frog_crossing::renderer::{Align, Color, RenderTarget, TextStyle, draw_session};
use frog_crossing::sim::Rect;
use frog_crossing::Session;

const CELL_W: f32 = 16.0;
const CELL_H: f32 = 40.0;
const GRID_W: u16 = (SCREEN_WIDTH / CELL_W) as u16;
const GRID_H: u16 = (SCREEN_HEIGHT / CELL_H) as u16 + 1;

type Rgb = [u8; 3];

fn to_rgb(color: Color) -> Rgb {
    [
        (color[0].clamp(0.0, 1.0) * 255.0) as u8,
        (color[1].clamp(0.0, 1.0) * 255.0) as u8,
        (color[2].clamp(0.0, 1.0) * 255.0) as u8,
    ]
}

fn blend(under: Rgb, over: Rgb, alpha: f32) -> Rgb {
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - alpha) + b as f32 * alpha) as u8;
    [mix(under[0], over[0]), mix(under[1], over[1]), mix(under[2], over[2])]
}

#[derive(Clone, Copy, PartialEq)]
struct FrameCell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

const BLANK: FrameCell = FrameCell {
    ch: ' ',
    fg: [255, 255, 255],
    bg: [0, 0, 0],
};

/// Cell grid implementing the render target, with diffed output
struct CellTarget {
    prev: Vec<FrameCell>,
    cur: Vec<FrameCell>,
    clip: Option<Rect>,
    /// Top-left of the grid in the terminal
    origin: (u16, u16),
}

impl CellTarget {
    fn new(term_w: u16, term_h: u16) -> Self {
        let size = GRID_W as usize * GRID_H as usize;
        Self {
            prev: vec![BLANK; size],
            cur: vec![BLANK; size],
            clip: None,
            origin: Self::center(term_w, term_h),
        }
    }

    fn center(term_w: u16, term_h: u16) -> (u16, u16) {
        (
            term_w.saturating_sub(GRID_W) / 2,
            term_h.saturating_sub(GRID_H) / 2,
        )
    }

    /// New terminal size; forces a full redraw
    fn resize(&mut self, term_w: u16, term_h: u16) {
        self.origin = Self::center(term_w, term_h);
        self.prev.fill(FrameCell { ch: '\0', ..BLANK });
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut FrameCell> {
        if col < 0 || row < 0 || col >= GRID_W as i32 || row >= GRID_H as i32 {
            return None;
        }
        let centre = Vec2::new(
            (col as f32 + 0.5) * CELL_W,
            (row as f32 + 0.5) * CELL_H,
        );
        if let Some(clip) = self.clip {
            if !(clip.left()..clip.right()).contains(&centre.x)
                || !(clip.top()..clip.bottom()).contains(&centre.y)
            {
                return None;
            }
        }
        self.cur.get_mut(row as usize * GRID_W as usize + col as usize)
    }

    /// Cells whose centre lies inside `rect`
    fn cells_in(rect: Rect) -> impl Iterator<Item = (i32, i32)> {
        let c0 = (rect.left() / CELL_W - 0.5).ceil() as i32;
        let c1 = (rect.right() / CELL_W - 0.5).ceil() as i32;
        let r0 = (rect.top() / CELL_H - 0.5).ceil() as i32;
        let r1 = (rect.bottom() / CELL_H - 0.5).ceil() as i32;
        (r0..r1).flat_map(move |r| (c0..c1).map(move |c| (c, r)))
    }

    fn flush_diff(&mut self, out: &mut Stdout) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let mut cur_fg = None::<Rgb>;
        let mut cur_bg = None::<Rgb>;

        for y in 0..GRID_H {
            let row_off = y as usize * GRID_W as usize;
            for x in 0..GRID_W {
                let i = row_off + x as usize;
                let a = self.cur[i];
                if a == self.prev[i] {
                    continue;
                }
                queue!(out, cursor::MoveTo(self.origin.0 + x, self.origin.1 + y))?;
                if cur_fg != Some(a.fg) {
                    let [r, g, b] = a.fg;
                    queue!(out, SetForegroundColor(TermColor::Rgb { r, g, b }))?;
                    cur_fg = Some(a.fg);
                }
                if cur_bg != Some(a.bg) {
                    let [r, g, b] = a.bg;
                    queue!(out, SetBackgroundColor(TermColor::Rgb { r, g, b }))?;
                    cur_bg = Some(a.bg);
                }
                queue!(out, Print(a.ch))?;
            }
        }

        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()?;
        self.prev.copy_from_slice(&self.cur);
        Ok(())
    }
}

impl RenderTarget for CellTarget {
    fn blit(&mut self, _image: ImageId, _frame: usize, dest: Rect) {
        // The terminal has no images; nothing hands out image ids here
        self.fill_rect(dest, [0.5, 0.5, 0.5, 1.0]);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rgb = to_rgb(color);
        let alpha = color[3].clamp(0.0, 1.0);
        for (c, r) in Self::cells_in(rect) {
            if let Some(cell) = self.cell_mut(c, r) {
                if alpha >= 1.0 {
                    *cell = FrameCell { ch: ' ', fg: cell.fg, bg: rgb };
                } else {
                    cell.bg = blend(cell.bg, rgb, alpha);
                    cell.fg = blend(cell.fg, rgb, alpha);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        let len = text.chars().count() as i32;
        let row = (pos.y / CELL_H).floor() as i32;
        let col = match style.align {
            Align::Left => (pos.x / CELL_W).floor() as i32,
            Align::Center => (pos.x / CELL_W).round() as i32 - len / 2,
        };
        let fg = to_rgb(style.color);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i as i32, row) {
                cell.ch = ch;
                cell.fg = fg;
            }
        }
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }
}

/// Images are drawn as placeholders; a few sounds map to the bell
struct TerminalAssets;

impl AssetProvider for TerminalAssets {
    fn image(&mut self, _path: &str) -> Option<ImageId> {
        None
    }

    fn sound(&mut self, path: &str) -> Option<SoundId> {
        match path {
            paths::SFX_GOAL | paths::SFX_LEVEL | paths::SFX_EXTRA_LIFE | paths::SFX_GAME_OVER => {
                Some(SoundId(0))
            }
            _ => None,
        }
    }
}

/// Rings the terminal bell after the next frame is flushed
#[derive(Default)]
struct BellBackend {
    pending: bool,
}

impl AudioBackend for BellBackend {
    fn play(&mut self, _sound: SoundId, _volume: f32) {
        self.pending = true;
    }
}

/// Key name used by the bindings, if the key has one
fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };
    Some(name)
}

fn open_store() -> Box<dyn Storage> {
    match JsonFileStore::open() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("No persistent storage ({}), nothing will be saved", e);
            Box::new(MemoryStore::default())
        }
    }
}

fn log_path() -> PathBuf {
    match JsonFileStore::open() {
        Ok(store) => store.dir().join("frog-crossing.log"),
        Err(_) => std::env::temp_dir().join("frog-crossing.log"),
    }
}

/// Log to a file so the terminal UI stays intact
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Ok(file) = File::create(log_path()) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
}

fn main() -> io::Result<()> {
    init_logging();
    log::info!("Frog Crossing starting...");

    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(
        out,
        EnterAlternateScreen,
        cursor::Hide,
        DisableLineWrap,
        terminal::Clear(terminal::ClearType::All)
    )?;

    let res = run(&mut out);

    // restore
    let _ = execute!(
        out,
        EnableLineWrap,
        cursor::Show,
        LeaveAlternateScreen,
        ResetColor
    );
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &res {
        log::error!("Terminal error: {}", e);
    }
    log::info!("Frog Crossing exiting");
    res
}

fn run(out: &mut Stdout) -> io::Result<()> {
    let (tw, th) = terminal::size()?;
    if tw < GRID_W || th < GRID_H {
        queue!(
            out,
            cursor::MoveTo(0, 0),
            Print(format!("Terminal too small. Need at least {}x{}.", GRID_W, GRID_H))
        )?;
        out.flush()?;
        std::thread::sleep(Duration::from_secs(2));
        return Ok(());
    }

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0xC0FFEE);
    let mut session = Session::new(open_store(), seed);
    let mut assets = AssetCache::new(TerminalAssets);
    let mut audio = AudioManager::new(BellBackend::default(), session.settings.volume);
    let mut target = CellTarget::new(tw, th);

    let mut last = Instant::now();
    loop {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }
                    if let Some(name) = key_name(k.code) {
                        session.handle_key(&name);
                    }
                }
                Event::Resize(w, h) => target.resize(w, h),
                _ => {}
            }
        }
        if session.should_quit() {
            return Ok(());
        }

        let now = Instant::now();
        session.update((now - last).as_secs_f32());
        last = now;

        audio.set_volume(session.settings.volume);
        let events = session.drain_events();
        audio.handle_events(&events, &mut assets);

        target.set_clip(None);
        draw_session(&session, &mut assets, &mut target);
        target.flush_diff(out)?;

        let bell = audio.backend_mut();
        if bell.pending {
            bell.pending = false;
            queue!(out, Print('\x07'))?;
            out.flush()?;
        }

        std::thread::sleep(Duration::from_millis(8));
    }
}
