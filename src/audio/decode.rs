use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::buffer::AudioBuffer;

pub fn decode_audio(path: &Path) -> Result<AudioBuffer> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let out_channels: u16 = if channels == 1 { 1 } else { 2 };
    let mut all_samples: Vec<i16> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<i16>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        if channels <= 2 {
            all_samples.extend_from_slice(samples);
        } else {
            // Fold surround layouts: even channels left, odd channels right
            for frame in samples.chunks(channels) {
                all_samples.extend(fold_to_stereo(frame));
            }
        }
    }

    let buffer = AudioBuffer::new(out_channels, sample_rate, all_samples)
        .context("Decoded audio has an unusable layout")?;

    log::info!(
        "Decoded audio: {} frames, {} ch, {}Hz, {:.1}s",
        buffer.frame_count(),
        buffer.channels(),
        sample_rate,
        buffer.duration_secs()
    );

    Ok(buffer)
}

fn fold_to_stereo(frame: &[i16]) -> [i16; 2] {
    let mut sums = [0i32; 2];
    let mut counts = [0i32; 2];
    for (i, &s) in frame.iter().enumerate() {
        sums[i % 2] += s as i32;
        counts[i % 2] += 1;
    }
    [
        (sums[0] / counts[0].max(1)) as i16,
        (sums[1] / counts[1].max(1)) as i16,
    ]
}
