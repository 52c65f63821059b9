#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tactical_map::scene::{PerspectiveCamera, Scene};
use tactical_map::{Backend, RenderError, Surface};

/// Layout state shared between a test and the surface it handed out.
#[derive(Default)]
pub struct Layout {
    pub size: Cell<(f64, f64)>,
    pub pixel_ratio: Cell<f64>,
    pub hidden: Cell<bool>,
}

pub struct FakeSurface(pub Rc<Layout>);

impl FakeSurface {
    pub fn new(width: f64, height: f64) -> (Self, Rc<Layout>) {
        let layout = Rc::new(Layout {
            size: Cell::new((width, height)),
            pixel_ratio: Cell::new(1.0),
            hidden: Cell::new(false),
        });
        (Self(layout.clone()), layout)
    }
}

impl Surface for FakeSurface {
    fn container_size(&self) -> (f64, f64) {
        self.0.size.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.0.pixel_ratio.get()
    }

    fn hide(&mut self) {
        self.0.hidden.set(true);
    }

    fn is_hidden(&self) -> bool {
        self.0.hidden.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    None,
    ContextLost,
    Broken,
}

/// Everything a backend was asked to do.
#[derive(Debug)]
pub struct Calls {
    pub sizes: Vec<(u32, u32)>,
    pub ratios: Vec<f64>,
    pub renders: usize,
    pub uploads: usize,
    pub uploaded_version: Option<u64>,
    pub restores: usize,
    pub released: bool,
    pub fault: Fault,
}

impl Default for Calls {
    fn default() -> Self {
        Self {
            sizes: Vec::new(),
            ratios: Vec::new(),
            renders: 0,
            uploads: 0,
            uploaded_version: None,
            restores: 0,
            released: false,
            fault: Fault::None,
        }
    }
}

pub struct RecordingBackend(pub Rc<RefCell<Calls>>);

impl RecordingBackend {
    pub fn new() -> (Self, Rc<RefCell<Calls>>) {
        let calls = Rc::new(RefCell::new(Calls::default()));
        (Self(calls.clone()), calls)
    }
}

impl Backend for RecordingBackend {
    fn set_size(&mut self, width: u32, height: u32) {
        self.0.borrow_mut().sizes.push((width, height));
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.0.borrow_mut().ratios.push(ratio);
    }

    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let mut calls = self.0.borrow_mut();
        match calls.fault {
            Fault::ContextLost => return Err(RenderError::ContextLost),
            Fault::Broken => return Err(RenderError::Unavailable("broken".into())),
            Fault::None => {}
        }
        let version = scene.points.positions_version();
        if calls.uploaded_version != Some(version) {
            calls.uploaded_version = Some(version);
            calls.uploads += 1;
        }
        calls.renders += 1;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        let mut calls = self.0.borrow_mut();
        calls.restores += 1;
        match calls.fault {
            Fault::Broken => Err(RenderError::Resource("program")),
            _ => {
                calls.fault = Fault::None;
                Ok(())
            }
        }
    }

    fn release(&mut self) {
        self.0.borrow_mut().released = true;
    }
}
