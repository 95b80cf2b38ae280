//! Stage-per-thread scheduler

use log::{debug, warn};
use parking_lot::Mutex;
use scoped_threadpool::Pool;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Fragment, GeometryVertex};
use crate::stream::{channel, Port, Receiver, Sender};

use super::PipelineConfig;
use super::stages::Stage;

/// Feeder, clipper, perspective divide and rasterizer
const PIPELINE_THREADS: u32 = 4;

/// Runs a stage until its input is closed and it has nothing left to do.
///
/// Every output is sent before the stage is stepped again, so the blocking `send` carries the
/// downstream back-pressure into the stage.
fn drive<S>(stage: &mut S, rx: Receiver<S::Input>, tx: Sender<S::Output>) -> RenderResult<()> where S: Stage {
    let mut input = Port::new();
    let mut output = Port::new();

    let mut closed = false;

    loop {
        let progressed = stage.step(&mut input, &mut output)?;

        if let Some(item) = output.take() {
            if tx.send(item).is_err() {
                debug!("Downstream stage went away");
                return Ok(());
            }
        }

        if progressed {
            continue;
        }

        if closed {
            break;
        }

        if input.is_free() {
            match rx.recv() {
                Some(item) => input.fill(item),
                None => closed = true,
            }
        }
    }

    if !stage.is_idle() {
        warn!("Stage input closed with an incomplete primitive");
    }

    Ok(())
}

fn record_error(slot: &Mutex<Option<RenderError>>, result: RenderResult<()>) {
    if let Err(err) = result {
        let mut slot = slot.lock();

        if slot.is_none() {
            *slot = Some(err);
        }
    }
}

/// Renders `vertices` with every stage on its own thread, connected by depth-1 channels.
///
/// Fragments are handed to `sink` on the calling thread, in the same order the cooperative
/// `Pipeline` produces them. The first stage error stops the pipeline and is returned.
pub fn render_threaded<F, const T: usize>(config: &PipelineConfig, vertices: &[GeometryVertex<T>], mut sink: F) -> RenderResult<()>
    where F: FnMut(&Fragment<T>) {
    let (mut clipper, mut divide, mut rasterizer) = config.build_stages::<T>()?;

    let (vertex_tx, vertex_rx) = channel();
    let (clipped_tx, clipped_rx) = channel();
    let (divided_tx, divided_rx) = channel();
    let (fragment_tx, fragment_rx) = channel();

    let error = Mutex::new(None);

    let mut pool = Pool::new(PIPELINE_THREADS);

    pool.scoped(|scope| {
        let error = &error;

        scope.execute(move || {
            for &vertex in vertices {
                if vertex_tx.send(vertex).is_err() {
                    break;
                }
            }
        });

        scope.execute(move || record_error(error, drive(&mut clipper, vertex_rx, clipped_tx)));
        scope.execute(move || record_error(error, drive(&mut divide, clipped_rx, divided_tx)));
        scope.execute(move || record_error(error, drive(&mut rasterizer, divided_rx, fragment_tx)));

        while let Some(fragment) = fragment_rx.recv() {
            sink(&fragment);
        }
    });

    match error.into_inner() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
