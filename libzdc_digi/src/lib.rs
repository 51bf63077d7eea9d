//! # zdc_digi
//!
//! zdc_digi turns the digitized readout of the CMS zero degree calorimeter (ZDC) into flat
//! tables. Every event carries a sparse, unordered collection of ZDC digis (one per channel
//! that was read out, each with a handful of time samples). zdc_digi places those digis into
//! a dense buffer addressed by channel and time sample, and appends one row per event to an
//! HDF5 file.
//!
//! ## Installation
//!
//! Currently the only method of install is from source.
//!
//! ### HDF5
//!
//! Before building and running zdc_digi, HDF5 must be installed. Typically this will be
//! installed using a package manager (homebrew, apt, etc), and the Rust libraries will auto
//! detect the location of the HDF install. If HDF5 is installed to a custom location, write
//! the following snippet into the file `.cargo/config.toml` in the repository:
//!
//! ```toml
//! [env]
//! HDF5_DIR="/path/to/my/hdf5/install/"
//!
//! [build]
//! rustflags="-C link-args=-Wl,-rpath,/path/to/my/hdf5/install/lib"
//! ```
//!
//! ### Building & Install
//!
//! To build and install the CLI use `cargo install --path ./zdc_digi_cli` from the top level
//! repository.
//!
//! ## Configuration
//!
//! A job is configured with a YAML file:
//!
//! ```yml
//! digi_tag: castorDigis
//! input_path: /path/to/events.yml
//! output_path: /path/to/zdc_digis.h5
//! ```
//!
//! `digi_tag` is the name of the digi collection that is read from each event. Events which
//! do not have a collection of that name still get a row in the beam table, but no row in the
//! digi table. Unknown keys are an error.
//!
//! ### Input Format
//!
//! The input is a YAML stream with one document per event:
//!
//! ```yml
//! ---
//! event: 2
//! run: 326776
//! lumi_block: 3
//! bunch_crossing: 1024
//! time: 7301234567890123776
//! collections:
//!   castorDigis:
//!     - id: {zside: 1, section: 2, channel: 3}
//!       samples:
//!         - {adc: 10, nominal_fc: 1.0}
//! ```
//!
//! `time` is optional; its upper 32 bits are seconds since the unix epoch.
//!
//! ## Channels
//!
//! Only the EM (section 1, channels 1-5) and HAD (section 2, channels 1-4) sections on both
//! sides (zside -1 and +1) are read out, 18 channels in all. Each gets a flat index
//!
//! ```text
//! index = (section - 1) * 5 + (zside == +1) * 9 + (channel - 1)
//! ```
//!
//! Digis with any other id are skipped and reported in the log. Up to 10 time samples per
//! channel are kept.
//!
//! ## Output
//!
//! ### HDF5 Data Format
//!
//! ```text
//! zdc_digis.h5
//! BeamTree - run_begin, start_time, lumi_min, lumi_max, n_events, version
//! |---- BunchXing(dset, N)
//! |---- LumiBlock(dset, N)
//! |---- Run(dset, N)
//! |---- Event(dset, N)
//! ZDCDigiTree - version
//! |---- negEM1fC(dset, M x 10), negEM1ADC(dset, M x 10)
//! |---- ... negEM2 - negEM5, negHD1 - negHD4, posEM1 - posEM5, posHD1 - posHD3
//! |---- posHD4fC(dset, M x 10), posHD4ADC(dset, M x 10)
//! ```
//!
//! N is the number of events; M is the number of events which had a digi collection. All
//! datasets are compressed with deflate at level 9. The file is flushed after every row, so
//! the tables can be read while a job is still running.
pub mod channel_map;
pub mod config;
pub mod constants;
pub mod digi;
pub mod error;
pub mod event;
pub mod event_source;
pub mod hdf_writer;
pub mod process;
pub mod record_builder;
pub mod run_context;
pub mod sample_buffer;
pub mod sink;
pub mod worker_status;
pub mod zdc_id;
