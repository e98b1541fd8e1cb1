//! winit event loop hosting one page of gutterline editors.

use std::sync::Arc;

use gfx::{EditorPage, Renderer, RendererError};
use surface::{FieldStore, PageNode, SurfaceConfig};
use winit::{
    application::ApplicationHandler,
    error::{EventLoopError, OsError},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("cannot create window: {0}")]
    Window(#[from] OsError),
    #[error(transparent)]
    Renderer(#[from] RendererError),
}

/// Open a window showing `page` and run until it is closed.
///
/// Returns the backing fields as they stand when the window closes.
pub fn run(
    config: SurfaceConfig,
    page: PageNode,
    store: FieldStore,
) -> Result<FieldStore, PlatformError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        pending: Some(Pending {
            config,
            page,
            store,
        }),
        running: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.error {
        return Err(err);
    }
    match (app.running, app.pending) {
        (Some(running), _) => Ok(running.page.into_store()),
        (None, Some(pending)) => Ok(pending.store),
        (None, None) => Ok(FieldStore::new()),
    }
}

struct Pending {
    config: SurfaceConfig,
    page: PageNode,
    store: FieldStore,
}

struct Running {
    window: Arc<Window>,
    renderer: Renderer,
    page: EditorPage,
}

struct App {
    pending: Option<Pending>,
    running: Option<Running>,
    error: Option<PlatformError>,
}

impl App {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), PlatformError> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let window = Arc::new(
            event_loop.create_window(Window::default_attributes().with_title("gutterline"))?,
        );
        let mut renderer = Renderer::new(Arc::clone(&window))?;
        renderer.set_clear_color(pending.config.theme.gutter_background);

        let page = EditorPage::new(
            renderer.context(),
            pending.config,
            &pending.page,
            pending.store,
        );
        log::info!(target: "platform", "showing {} editors", page.controller().len());

        window.request_redraw();
        self.running = Some(Running {
            window,
            renderer,
            page,
        });
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!(target: "platform", "startup failed: {err}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        if running.renderer.on_window_event(&running.window, &event) {
            running.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                running.renderer.resize(size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let Running {
                    window,
                    renderer,
                    page,
                } = running;
                renderer.render(window, |ctx| {
                    egui::CentralPanel::default().show(ctx, |ui| page.show(ui));
                });
            }
            _ => {}
        }
    }
}
