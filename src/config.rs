// Command-line options for the window app.
use std::path::PathBuf;

use clap::Parser;
use mask_brush::{BrushSpec, MaskStyle};

#[derive(Debug, Parser)]
#[command(name = "mask-brush", about = "Paint a mask over a photo and save the cut-out")]
pub struct Args {
    /// Photo to paint over.
    pub photo: PathBuf,

    /// Brush diameter in pixels.
    #[arg(long, default_value_t = 35, value_parser = clap::value_parser!(u32).range(1..=500))]
    pub size: u32,

    /// Brush hardness in percent; 100 is a hard edge.
    #[arg(long, default_value_t = 99, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub hardness: u32,

    /// Brush opacity in percent.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub opacity: u32,

    /// Paint what to remove instead of what to keep.
    #[arg(long)]
    pub cut_out: bool,

    /// Where `S` writes image.png and mask.png.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

impl Args {
    pub fn brush(&self) -> BrushSpec {
        BrushSpec::from_sliders(self.size, self.hardness, self.opacity)
    }

    pub fn style(&self) -> MaskStyle {
        if self.cut_out { MaskStyle::CUT_OUT } else { MaskStyle::REVEAL }
    }
}
