use hdf5::types::{H5Type, VarLenUnicode};
use hdf5::{Dataset, File, Group};
use ndarray::{s, ArrayView1, Axis};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::channel_map::channel_name;
use super::constants::{NO_START_TIME, NUMBER_OF_CHANNELS, SAMPLES_PER_CHANNEL};
use super::error::{HDF5WriterError, SinkError};
use super::run_context::RunSummary;
use super::sample_buffer::SampleBuffer;
use super::sink::{BeamRow, TabularSink};

const BEAM_NAME: &str = "BeamTree";
const DIGI_NAME: &str = "ZDCDigiTree";
const BUNCH_CROSSING_NAME: &str = "BunchXing";
const LUMI_BLOCK_NAME: &str = "LumiBlock";
const RUN_NAME: &str = "Run";
const EVENT_NAME: &str = "Event";
const FC_SUFFIX: &str = "fC";
const ADC_SUFFIX: &str = "ADC";

// Maximum deflate level
const COMPRESSION_LEVEL: u8 = 9;
const CHUNK_ROWS: usize = 1024;
/// This is the version of the output format
const FORMAT_VERSION: &str = "v1";

/// The fC and ADC columns of one channel
#[derive(Debug)]
struct ChannelColumns {
    fc: Dataset,
    adc: Dataset,
}

/// A simple struct which wraps around the hdf5-rust library.
///
/// Opens an HDF5 file and creates both tables, then appends one row per call. Every column is
/// an extendable, chunked and compressed dataset whose first axis is the row number.
#[derive(Debug)]
pub struct HDFWriter {
    file_handle: File,
    path: PathBuf,
    beam_group: Group,
    digi_group: Group,
    bunch_crossing: Dataset,
    lumi_block: Dataset,
    run: Dataset,
    event: Dataset,
    channels: Vec<ChannelColumns>,
    beam_rows: usize,
    sample_rows: usize,
}
// Structure
// BeamTree - run_begin, start_time, lumi_min, lumi_max, n_events, version
// |---- BunchXing(dset, N)
// |---- LumiBlock(dset, N)
// |---- Run(dset, N)
// |---- Event(dset, N)
// ZDCDigiTree - version
// |---- negEM1fC(dset, M x 10)
// |---- negEM1ADC(dset, M x 10)
// |---- ... one pair per channel, through posHD4

impl HDFWriter {
    /// Create the writer, opening a file at path and creating both tables
    pub fn new(path: &Path) -> Result<Self, HDF5WriterError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(HDF5WriterError::BadFilePath(path.to_path_buf()));
            }
        }
        let file_handle = File::create(path)?;
        let version = VarLenUnicode::from_str(&format!(
            "{}:{}",
            env!("CARGO_PKG_NAME"),
            FORMAT_VERSION
        ))?;

        let beam_group = file_handle.create_group(BEAM_NAME)?;
        beam_group.new_attr::<u32>().create("run_begin")?;
        beam_group.new_attr::<u32>().create("lumi_min")?;
        beam_group.new_attr::<u32>().create("lumi_max")?;
        beam_group.new_attr::<u64>().create("n_events")?;
        beam_group
            .new_attr::<VarLenUnicode>()
            .create("start_time")?;
        beam_group
            .new_attr::<VarLenUnicode>()
            .create("version")?
            .write_scalar(&version)?;

        let bunch_crossing = create_column::<i32>(&beam_group, BUNCH_CROSSING_NAME, None)?;
        let lumi_block = create_column::<u32>(&beam_group, LUMI_BLOCK_NAME, None)?;
        let run = create_column::<u32>(&beam_group, RUN_NAME, None)?;
        let event = create_column::<u64>(&beam_group, EVENT_NAME, None)?;

        let digi_group = file_handle.create_group(DIGI_NAME)?;
        digi_group
            .new_attr::<VarLenUnicode>()
            .create("version")?
            .write_scalar(&version)?;
        let mut channels = Vec::with_capacity(NUMBER_OF_CHANNELS);
        for name in (0..NUMBER_OF_CHANNELS).filter_map(channel_name) {
            channels.push(ChannelColumns {
                fc: create_column::<f32>(
                    &digi_group,
                    &format!("{name}{FC_SUFFIX}"),
                    Some(SAMPLES_PER_CHANNEL),
                )?,
                adc: create_column::<i32>(
                    &digi_group,
                    &format!("{name}{ADC_SUFFIX}"),
                    Some(SAMPLES_PER_CHANNEL),
                )?,
            });
        }

        Ok(Self {
            file_handle,
            path: path.to_path_buf(),
            beam_group,
            digi_group,
            bunch_crossing,
            lumi_block,
            run,
            event,
            channels,
            beam_rows: 0,
            sample_rows: 0,
        })
    }

    pub fn beam_rows(&self) -> usize {
        self.beam_rows
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    /// Write the run bookkeeping to the beam table attributes, consume the writer
    pub fn close(self, summary: &RunSummary) -> Result<PathBuf, HDF5WriterError> {
        self.beam_group
            .attr("n_events")?
            .write_scalar(&summary.n_events)?;
        let start_time = match &summary.run {
            Some(info) => {
                self.beam_group
                    .attr("run_begin")?
                    .write_scalar(&info.run_begin)?;
                self.beam_group
                    .attr("lumi_min")?
                    .write_scalar(&info.lumi_min)?;
                self.beam_group
                    .attr("lumi_max")?
                    .write_scalar(&info.lumi_max)?;
                info.start_time_string()
            }
            None => {
                log::warn!("No events were processed; run attributes are left empty");
                String::from(NO_START_TIME)
            }
        };
        self.beam_group
            .attr("start_time")?
            .write_scalar(&VarLenUnicode::from_str(&start_time)?)?;
        log::info!(
            "{} beam rows and {} sample rows written to {}",
            self.beam_rows,
            self.sample_rows,
            self.path.to_string_lossy()
        );
        self.file_handle.flush()?;
        Ok(self.path)
    }

    fn write_beam(&mut self, row: &BeamRow) -> Result<(), HDF5WriterError> {
        let n = self.beam_rows;
        append_value(&self.bunch_crossing, n, row.bunch_crossing)?;
        append_value(&self.lumi_block, n, row.lumi_block)?;
        append_value(&self.run, n, row.run)?;
        append_value(&self.event, n, row.event)?;
        self.beam_rows += 1;
        self.file_handle.flush()?;
        Ok(())
    }

    fn write_samples(&mut self, buffer: &SampleBuffer) -> Result<(), HDF5WriterError> {
        let n = self.sample_rows;
        for (channel, columns) in self.channels.iter().enumerate() {
            append_samples(&columns.fc, n, buffer.channel_fc(channel))?;
            append_samples(&columns.adc, n, buffer.channel_adc(channel))?;
        }
        self.sample_rows += 1;
        self.file_handle.flush()?;
        Ok(())
    }
}

impl TabularSink for HDFWriter {
    fn append_beam(&mut self, row: &BeamRow) -> Result<(), SinkError> {
        Ok(self.write_beam(row)?)
    }

    fn append_samples(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError> {
        Ok(self.write_samples(buffer)?)
    }
}

/// Create an empty column which can grow along its first axis. Scalar columns have shape (N,),
/// array columns (N, width).
fn create_column<T: H5Type>(
    group: &Group,
    name: &str,
    width: Option<usize>,
) -> Result<Dataset, HDF5WriterError> {
    let builder = group.new_dataset::<T>();
    let builder = match width {
        Some(w) => builder.shape((0.., w)).chunk((CHUNK_ROWS, w)),
        None => builder.shape((0..,)).chunk((CHUNK_ROWS,)),
    };
    Ok(builder.deflate(COMPRESSION_LEVEL).create(name)?)
}

fn append_value<T: H5Type>(dataset: &Dataset, row: usize, value: T) -> Result<(), HDF5WriterError> {
    dataset.resize((row + 1,))?;
    let view = ArrayView1::from(std::slice::from_ref(&value));
    dataset.write_slice(view, s![row..row + 1])?;
    Ok(())
}

fn append_samples<T: H5Type>(
    dataset: &Dataset,
    row: usize,
    samples: ArrayView1<'_, T>,
) -> Result<(), HDF5WriterError> {
    dataset.resize((row + 1, SAMPLES_PER_CHANNEL))?;
    dataset.write_slice(samples.insert_axis(Axis(0)), s![row..row + 1, ..])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digi::ZdcSample;
    use crate::event::EventHeader;
    use crate::constants::CHANNEL_NAMES;
    use crate::run_context::RunContext;
    use hdf5::filters::Filter;
    use tempfile::tempdir;

    #[test]
    fn test_tables_grow_row_by_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zdc.h5");
        let mut writer = HDFWriter::new(&path).unwrap();
        let mut ctx = RunContext::new();
        let mut buffer = SampleBuffer::new();

        for event in 1..=3u64 {
            let header = EventHeader {
                event,
                run: 7,
                lumi_block: 10 - event as u32,
                bunch_crossing: 100 + event as i32,
                time: None,
            };
            ctx.observe(&header);
            writer.append_beam(&BeamRow::from(&header)).unwrap();
            if event != 2 {
                buffer.reset();
                buffer.fill_channel(16, &[ZdcSample::new(event as i32, 0.5)]);
                writer.append_samples(&buffer).unwrap();
            }
        }
        assert_eq!(writer.beam_rows(), 3);
        assert_eq!(writer.sample_rows(), 2);
        writer.close(&ctx.finish()).unwrap();

        let file = File::open(&path).unwrap();
        let lumi = file
            .dataset("BeamTree/LumiBlock")
            .unwrap()
            .read_1d::<u32>()
            .unwrap();
        assert_eq!(lumi.to_vec(), vec![9, 8, 7]);
        let events = file
            .dataset("BeamTree/Event")
            .unwrap()
            .read_1d::<u64>()
            .unwrap();
        assert_eq!(events.to_vec(), vec![1, 2, 3]);

        let adc = file
            .dataset("ZDCDigiTree/posHD3ADC")
            .unwrap()
            .read_2d::<i32>()
            .unwrap();
        assert_eq!(adc.shape(), &[2, SAMPLES_PER_CHANNEL]);
        assert_eq!(adc[[0, 0]], 1);
        assert_eq!(adc[[1, 0]], 3);
        let fc = file
            .dataset("ZDCDigiTree/negEM1fC")
            .unwrap()
            .read_2d::<f32>()
            .unwrap();
        assert_eq!(fc.sum(), 0.0);

        let beam = file.group("BeamTree").unwrap();
        let lumi_min: u32 = beam.attr("lumi_min").unwrap().read_scalar().unwrap();
        let lumi_max: u32 = beam.attr("lumi_max").unwrap().read_scalar().unwrap();
        let n_events: u64 = beam.attr("n_events").unwrap().read_scalar().unwrap();
        assert_eq!((lumi_min, lumi_max, n_events), (7, 9, 3));
    }

    #[test]
    fn test_every_channel_has_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.h5");
        let writer = HDFWriter::new(&path).unwrap();
        writer.close(&RunContext::new().finish()).unwrap();

        let file = File::open(&path).unwrap();
        let digi = file.group("ZDCDigiTree").unwrap();
        for name in CHANNEL_NAMES {
            let fc = digi.dataset(&format!("{name}fC")).unwrap();
            let adc = digi.dataset(&format!("{name}ADC")).unwrap();
            for column in [&fc, &adc] {
                assert_eq!(column.shape(), vec![0, SAMPLES_PER_CHANNEL]);
                assert_eq!(column.chunk(), Some(vec![CHUNK_ROWS, SAMPLES_PER_CHANNEL]));
                assert!(column.filters().contains(&Filter::Deflate(COMPRESSION_LEVEL)));
            }
        }
        assert_eq!(digi.member_names().unwrap().len(), 2 * NUMBER_OF_CHANNELS);

        let beam = file.group("BeamTree").unwrap();
        for name in ["BunchXing", "LumiBlock", "Run", "Event"] {
            let column = beam.dataset(name).unwrap();
            assert_eq!(column.chunk(), Some(vec![CHUNK_ROWS]));
            assert!(column.filters().contains(&Filter::Deflate(9)));
        }
        let start_time: VarLenUnicode = beam.attr("start_time").unwrap().read_scalar().unwrap();
        assert_eq!(start_time.as_str(), "NotAvailable");
        let version: VarLenUnicode = beam.attr("version").unwrap().read_scalar().unwrap();
        assert!(version.as_str().ends_with(":v1"));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("zdc.h5");
        match HDFWriter::new(&path) {
            Err(HDF5WriterError::BadFilePath(p)) => assert_eq!(p, path),
            _ => panic!(),
        }
    }
}
