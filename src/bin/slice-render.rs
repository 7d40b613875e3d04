use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use volume_slicer::config::SliceOptions;
use volume_slicer::model::Plane;
use volume_slicer::slicing::{self, Slice};
use volume_slicer::volume::{load_layers, load_raw, Interpolation, VolumeMeta, VolumeTransform, VoxelGrid};

/// Renders planar cross-sections of a voxel volume to PNG.
#[derive(Parser, Debug)]
#[command(name = "slice-render")]
struct Args {
    /// Directory of numbered layer images (`00000.tif`, `layer_001.png`, ...).
    #[arg(long, conflicts_with = "raw", required_unless_present = "raw")]
    layers: Option<PathBuf>,

    /// Uncompressed 8-bit raw volume, needs `--dims`.
    #[arg(long, requires = "dims")]
    raw: Option<PathBuf>,

    /// Voxel counts of the raw volume as `X,Y,Z`.
    #[arg(long, value_parser = parse_dims)]
    dims: Option<[usize; 3]>,

    /// Voxel size as `X,Y,Z`, overrides the dataset's metadata.
    #[arg(long, value_parser = parse_vector)]
    voxel_size: Option<[f64; 3]>,

    /// A point on the cutting plane (world coordinates).
    #[arg(long, value_parser = parse_vector, default_value = "0,0,0", allow_hyphen_values = true)]
    position: [f64; 3],

    /// The cutting plane's normal (world coordinates).
    #[arg(long, value_parser = parse_vector, default_value = "0,0,1", allow_hyphen_values = true)]
    normal: [f64; 3],

    /// Pose of the volume in the world, inline JSON or a path to a JSON file.
    #[arg(long)]
    transform: Option<String>,

    #[arg(long, value_enum)]
    interpolation: Option<Interpolation>,

    /// Read the volume with its x axis reversed.
    #[arg(long)]
    mirror_x: bool,

    /// Slice options, inline JSON or a path to a JSON file. Flags take precedence.
    #[arg(long)]
    config: Option<String>,

    /// Output image, `<stem>_NNN.png` files next to it with `--sweep`.
    #[arg(short, long, default_value = "slice.png")]
    output: PathBuf,

    /// Render this many parallel slices spread across the volume along the normal.
    #[arg(long)]
    sweep: Option<usize>,
}

fn parse_vector(s: &str) -> Result<[f64; 3]> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().with_context(|| format!("Invalid number '{}'", p)))
        .collect::<Result<Vec<_>>>()?;
    match parts[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => bail!("Expected three comma separated values but got '{}'", s),
    }
}

fn parse_dims(s: &str) -> Result<[usize; 3]> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<usize>().with_context(|| format!("Invalid count '{}'", p)))
        .collect::<Result<Vec<_>>>()?;
    match parts[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => bail!("Expected three comma separated counts but got '{}'", s),
    }
}

impl Args {
    fn meta_for(&self, dataset: &Path) -> Result<VolumeMeta> {
        let mut meta = VolumeMeta::load_beside(dataset)?;
        if let Some(voxel_size) = self.voxel_size {
            meta.voxel_size = voxel_size;
        }
        Ok(meta)
    }

    fn load_volume(&self) -> Result<VoxelGrid<u8>> {
        match (&self.layers, &self.raw) {
            (Some(dir), _) => load_layers(dir, &self.meta_for(dir)?),
            (None, Some(file)) => {
                let dims = self.dims.ok_or_else(|| anyhow!("--raw needs --dims"))?;
                load_raw(file, dims, &self.meta_for(file)?)
            }
            (None, None) => bail!("Either --layers or --raw is required"),
        }
    }

    fn slice_options(&self) -> Result<SliceOptions> {
        let mut options = match &self.config {
            Some(config) => SliceOptions::from_json_or_path(config)?,
            None => SliceOptions::default(),
        };
        if let Some(interpolation) = self.interpolation {
            options.interpolation = interpolation;
        }
        if self.mirror_x {
            options.mirror_x = true;
        }
        Ok(options)
    }

    fn sweep_path(&self, i: usize) -> PathBuf {
        let stem = self.output.file_stem().and_then(|s| s.to_str()).unwrap_or("slice");
        let dir = self.output.parent().unwrap_or(Path::new("."));
        dir.join(format!("{}_{:03}.png", stem, i))
    }
}

fn save(slice: &Slice<u8>, path: &Path) -> Result<()> {
    slice
        .raster
        .to_gray_image()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn render_sweep(
    volume: &VoxelGrid<u8>,
    transform: &VolumeTransform,
    world_plane: &Plane,
    options: &SliceOptions,
    args: &Args,
    count: usize,
) -> Result<()> {
    use indicatif::{ParallelProgressIterator, ProgressStyle};
    use rayon::prelude::*;

    let local_plane = transform
        .world_to_local_plane(world_plane)
        .ok_or_else(|| anyhow!("The plane normal collapses in the volume's frame"))?;
    let planes = slicing::sweep_planes(volume, &local_plane, count);

    let style = ProgressStyle::with_template("[{elapsed_precise}] {bar:80.cyan/blue} {pos}/{len} ({eta}) {msg}")?;
    let rendered = planes
        .into_par_iter()
        .enumerate()
        .progress_with_style(style)
        .with_message("Rendering slices")
        .map(|(i, plane)| match slicing::slice(volume, &plane, options) {
            Some(slice) => save(&slice, &args.sweep_path(i)).map(|_| true),
            None => {
                log::debug!("No slice for sweep step {}", i);
                Ok(false)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    let written = rendered.iter().filter(|r| **r).count();
    println!("Wrote {} of {} slices next to {}", written, count, args.output.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let args = Args::parse();
    let options = args.slice_options()?;
    let transform = match &args.transform {
        Some(transform) => VolumeTransform::from_json_or_path(transform)?,
        None => VolumeTransform::default(),
    };
    let Some(world_plane) = Plane::new(args.position.into(), args.normal.into()) else {
        bail!("Plane normal {:?} has no direction", args.normal);
    };

    let start = std::time::Instant::now();
    let volume = args.load_volume()?;
    log::info!("Loaded {:?} in {:?}", volume, start.elapsed());

    if let Some(count) = args.sweep {
        return render_sweep(&volume, &transform, &world_plane, &options, &args, count);
    }

    match slicing::slice_world(&volume, &transform, &world_plane, &options) {
        Some(slice) => {
            save(&slice, &args.output)?;
            println!(
                "Wrote {}x{} slice to {}",
                slice.raster.width(),
                slice.raster.height(),
                args.output.display()
            );
        }
        None => println!("no slice at this pose"),
    }
    Ok(())
}
