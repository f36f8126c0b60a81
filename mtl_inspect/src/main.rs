//! MTL inspection tool
//!
//! Parses a material library the same way the loader would at runtime and
//! prints what every material resolves to, including skipped statements.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::{Path, PathBuf};

use mtl_loader::foundation::logging;
use mtl_loader::prelude::*;

fn main() -> Result<()> {
    let matches = Command::new("mtl_inspect")
        .about("Prints the materials an MTL file resolves to")
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("MTL file to inspect")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Loader configuration (.toml or .ron)"),
        )
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("NAME")
                .help("Built-in shading profile: standard, unlit or empty"),
        )
        .arg(
            Arg::new("assets-dir")
                .short('a')
                .long("assets-dir")
                .value_name("DIR")
                .help("Directory textures are resolved against (defaults to the MTL file's directory)"),
        )
        .arg(
            Arg::new("no-metallic-gloss")
                .long("no-metallic-gloss")
                .help("Skip the conventional metallic/gloss texture autoload")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let mtl_path = matches
        .get_one::<String>("file")
        .context("No MTL file given")?;

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => LoaderConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration '{}'", path))?,
        None => LoaderConfig::default().with_assets_dir(default_assets_dir(mtl_path)),
    };

    if let Some(name) = matches.get_one::<String>("profile") {
        let Some(profile) = ShadingProfile::by_name(name) else {
            bail!("Unknown shading profile '{}'", name);
        };
        config = config.with_profile(profile);
    }
    if let Some(dir) = matches.get_one::<String>("assets-dir") {
        config = config.with_assets_dir(dir.as_str());
    }
    if matches.get_flag("no-metallic-gloss") {
        config.metallic_gloss.enabled = false;
    }

    logging::init_with_level(&config.log_level);
    config.validate().context("Invalid configuration")?;

    log::info!("Resolving textures against '{}'", config.assets_dir);
    let textures = TextureResolver::new(config.file_store());
    let parser = MtlParser::new(&config.profile, &textures).with_options(config.parse_options());

    let report = parser
        .parse_path_detailed(&FileSystemStore::default(), mtl_path)
        .with_context(|| format!("Failed to read '{}'", mtl_path))?;

    print_report(mtl_path, &report);
    Ok(())
}

fn default_assets_dir(mtl_path: &str) -> String {
    Path::new(mtl_path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        .display()
        .to_string()
}

fn print_report(mtl_path: &str, report: &ParseReport) {
    println!("{}: {} material(s)", mtl_path, report.library.len());

    for (name, material) in &report.library {
        println!();
        print_material(name, material);
    }

    if !report.diagnostics.is_empty() {
        println!();
        println!("Skipped statements:");
        for diagnostic in &report.diagnostics {
            println!("  line {:>4}  {:<10} {}", diagnostic.line, diagnostic.keyword, diagnostic.error);
        }
    }
}

fn print_material(name: &str, material: &MaterialRecord) {
    let c = material.base_color;
    println!("newmtl {}", name);
    println!("  base color      ({:.3}, {:.3}, {:.3}, {:.3})", c.x, c.y, c.z, c.w);
    println!("  alpha mode      {:?}", material.alpha_mode);

    if let Some(s) = material.specular_color {
        println!("  specular        ({:.3}, {:.3}, {:.3})", s.x, s.y, s.z);
    }
    if let Some(e) = material.emission_color {
        println!("  emission        ({:.3}, {:.3}, {:.3}, {:.3})", e.x, e.y, e.z, e.w);
    }
    if let Some(g) = material.glossiness {
        println!("  glossiness      {:.3}", g);
    }
    if let Some(b) = material.bump_scale {
        println!("  bump scale      {:.3}", b);
    }
    if material.main_texture_scale != Vec2::new(1.0, 1.0) {
        let s = material.main_texture_scale;
        println!("  texture scale   ({}, {})", s.x, s.y);
    }

    let maps = [
        ("base color map", &material.base_color_map),
        ("bump map", &material.bump_map),
        ("emission map", &material.emission_map),
        ("metallic gloss", &material.metallic_gloss_map),
    ];
    for (label, texture) in maps {
        if let Some(texture) = texture {
            println!(
                "  {:<15} {} ({}x{}, {} bytes)",
                label,
                texture.path.display(),
                texture.image.width,
                texture.image.height,
                texture.image.size_bytes()
            );
        }
    }

    if !material.keywords.is_empty() {
        let keywords: Vec<&str> = material.keywords.iter().map(String::as_str).collect();
        println!("  keywords        {}", keywords.join(" "));
    }
}
