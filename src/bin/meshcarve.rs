// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fs;
use std::path::Path;

extern crate clap;
extern crate image;

use clap::{App, Arg, ArgMatches};
use failure::Error;

use meshcarve::{CostProcessor, ForwardEnergy, Mask, Orientation, SeamCarver};

fn main() {
    if let Err(error) = run() {
        eprintln!("meshcarve: {}", error);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let matches = App::new("meshcarve")
        .version("0.1.0")
        .about("Content-aware image resizing")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the carved image")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .help("Target width in pixels (defaults to the input width)"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .help("Target height in pixels (defaults to the input height)"),
        )
        .arg(
            Arg::with_name("protect")
                .long("protect")
                .takes_value(true)
                .help("Stencil image of pixels no seam may cross (near-white = protected)"),
        )
        .arg(
            Arg::with_name("remove")
                .long("remove")
                .takes_value(true)
                .conflicts_with_all(&["width", "height", "protect", "replace"])
                .help("Stencil image of pixels to carve out, shrinking the image"),
        )
        .arg(
            Arg::with_name("replace")
                .long("replace")
                .takes_value(true)
                .conflicts_with_all(&["width", "height", "protect"])
                .help("Stencil image of pixels to carve out and fill back in"),
        )
        .arg(
            Arg::with_name("forward")
                .long("forward")
                .help("Use forward-energy seam costs"),
        )
        .arg(
            Arg::with_name("energy-map")
                .long("energy-map")
                .takes_value(true)
                .help("Also write the energy map visualization to this path"),
        )
        .arg(
            Arg::with_name("cost-matrix")
                .long("cost-matrix")
                .takes_value(true)
                .help("Also write the vertical cost matrix visualization to this path"),
        )
        .arg(
            Arg::with_name("frames")
                .long("frames")
                .takes_value(true)
                .help("Record every carve step and dump numbered PNGs into this directory"),
        )
        .get_matches();

    let input = image::open(matches.value_of("input").unwrap())?.to_rgb8();

    let mut carver = SeamCarver::new(&input)?;
    if matches.is_present("forward") {
        let processor: Box<dyn CostProcessor> = Box::new(ForwardEnergy);
        carver = carver.with_processor(processor);
    }
    if matches.is_present("frames") {
        carver = carver.recording();
    }

    if let Some(path) = matches.value_of("remove") {
        carver.remove_area(&load_mask(path)?)?;
    } else if let Some(path) = matches.value_of("replace") {
        carver.replace_area(&load_mask(path)?)?;
    } else {
        let width = parse_dimension(&matches, "width", carver.width())?;
        let height = parse_dimension(&matches, "height", carver.height())?;
        match matches.value_of("protect") {
            Some(path) => carver.resize_protected(width, height, &load_mask(path)?)?,
            None => carver.resize(width, height)?,
        }
    }

    carver.current_image().save(matches.value_of("output").unwrap())?;

    if let Some(path) = matches.value_of("energy-map") {
        carver.energy_map_image()?.save(path)?;
    }
    if let Some(path) = matches.value_of("cost-matrix") {
        carver.cost_matrix_image(Orientation::Vertical)?.save(path)?;
    }
    if let Some(directory) = matches.value_of("frames") {
        dump_frames(&carver, Path::new(directory))?;
    }
    Ok(())
}

fn parse_dimension(matches: &ArgMatches, name: &str, fallback: u32) -> Result<u32, Error> {
    match matches.value_of(name) {
        Some(value) => Ok(value.parse::<u32>()?),
        None => Ok(fallback),
    }
}

fn load_mask(path: &str) -> Result<Mask, Error> {
    let stencil = image::open(path)?.to_rgb8();
    Ok(Mask::from_image(&stencil)?)
}

fn dump_frames(carver: &SeamCarver, directory: &Path) -> Result<(), Error> {
    fs::create_dir_all(directory)?;
    for (index, frame) in carver.history()?.iter().enumerate() {
        frame.save(directory.join(format!("frame_{:04}.png", index)))?;
    }
    Ok(())
}
