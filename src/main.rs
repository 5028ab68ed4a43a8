// What you SEE:
// • The photo's window starts empty (checkerboard) in reveal mode, or shows the
//   whole photo with --cut-out.
// • Hold Left Mouse to paint the mask; the masked photo updates every frame.
// • E toggles mark/erase, C clears, S saves image.png + mask.png,
//   [ ] change brush size, - = change hardness. ESC quits.

mod config;
mod draw;

use std::fs;

use clap::Parser;
use config::Args;
use draw::{Drawer, FrameBuffer, PointerEvent, PointerTracker, compose_checkerboard};
use log::{info, warn};
use mask_brush::types::MAX_DIAMETER;
use mask_brush::{BrushSpec, Error, MaskEditor, PaintMode, SourcePhoto};
use minifb::Key;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let photo = SourcePhoto::open(&args.photo)?;
    let (w, h) = photo.dimensions();
    let mut editor = MaskEditor::new(w, h, args.style())?;
    editor.load_photo(photo)?;

    let mut brush = args.brush();
    let mut hardness = args.hardness;
    let mut mode = PaintMode::Mark;

    let mut drawer = Drawer::new(&title(&brush, mode), w as usize, h as usize)?;
    let mut screen = FrameBuffer::new(w as usize, h as usize);
    let mut pointer = PointerTracker::default();

    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Pointer: press starts a stroke and paints once, each move paints,
           release or leaving the window ends it. */
        match pointer.update(drawer.mouse_pos(), drawer.left_mouse_down()) {
            PointerEvent::Press(mx, my) => {
                editor.begin();
                editor.sample(mx, my, &brush, mode);
            }
            PointerEvent::Move(mx, my) => {
                editor.sample(mx, my, &brush, mode);
            }
            PointerEvent::Release => editor.end(),
            PointerEvent::Idle => {}
        }

        /* 2) Keys */
        let mut settings_changed = false;
        if drawer.pressed_once(Key::E) {
            mode = mode.toggle();
            settings_changed = true;
        }
        if drawer.pressed_once(Key::C) {
            editor.clear();
        }
        if drawer.pressed_once(Key::LeftBracket) {
            brush.diameter = (brush.diameter - 5.0).max(1.0);
            settings_changed = true;
        }
        if drawer.pressed_once(Key::RightBracket) {
            brush.diameter = (brush.diameter + 5.0).min(MAX_DIAMETER);
            settings_changed = true;
        }
        if drawer.pressed_once(Key::Minus) {
            hardness = hardness.saturating_sub(10);
            brush = BrushSpec { blur_radius: (100 - hardness) as f32, ..brush };
            settings_changed = true;
        }
        if drawer.pressed_once(Key::Equal) {
            hardness = (hardness + 10).min(100);
            brush = BrushSpec { blur_radius: (100 - hardness) as f32, ..brush };
            settings_changed = true;
        }
        if settings_changed {
            drawer.set_title(&title(&brush, mode));
        }

        /* 3) Once per frame: mask transform + composite, if anything changed. */
        editor.refresh()?;

        if drawer.pressed_once(Key::S) {
            if let Err(e) = save(&editor, &args) {
                warn!("save failed: {e}");
            }
        }

        /* 4) Present */
        compose_checkerboard(editor.surfaces().preview(), &mut screen);
        drawer.present(&screen)?;
    }

    Ok(())
}

fn title(brush: &BrushSpec, mode: PaintMode) -> String {
    let mode = match mode {
        PaintMode::Mark => "mark",
        PaintMode::Erase => "erase",
    };
    format!(
        "Mask Brush | {mode} | size {:.0} blur {:.0} opacity {:.0}%",
        brush.diameter,
        brush.blur_radius,
        brush.opacity * 100.0
    )
}

fn save(editor: &MaskEditor, args: &Args) -> Result<(), Error> {
    fs::create_dir_all(&args.out_dir)?;
    let image_path = args.out_dir.join("image.png");
    let mask_path = args.out_dir.join("mask.png");
    fs::write(&image_path, editor.export_preview_png()?)?;
    fs::write(&mask_path, editor.export_mask_png()?)?;
    info!("saved {} and {}", image_path.display(), mask_path.display());
    Ok(())
}
