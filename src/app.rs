//! Main application state and egui integration.
//!
//! Network calls run on a background tokio runtime and report back as
//! `AppEvent`s over a crossbeam channel, drained at the start of every frame.
//! All browser state is owned and mutated here, on the UI thread.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crossbeam::channel::{unbounded, Receiver, Sender};
use eframe::egui;

use routeshare::api::{
    ApiClient, ApiError, Review, ReviewSort, RouteApi, RouteDetail, TaskStatus, VoteResult,
};
use routeshare::browser::{
    fetch_comparison, BrowserMessage, Debouncer, LoadState, MapBounds, RouteBrowser, RouteTrace,
};
use routeshare::jobs::{load_gpx, poll_task, CancelHandle, PollConfig, PollError};
use routeshare::storage::config::{self, AppConfig};
use routeshare::ui::screens::{
    JobStatus, RouteBrowserAction, RouteBrowserScreen, RouteReviewsAction, RouteReviewsScreen,
    RouteSubmitAction, RouteSubmitScreen, Screen,
};
use routeshare::ui::theme::Theme;
use routeshare::ui::widgets::show_comparison;

/// Results delivered from background tasks.
enum AppEvent {
    Browser(BrowserMessage),
    TraceLoaded {
        seq: u64,
        result: Result<RouteDetail, ApiError>,
    },
    ReviewsLoaded {
        route_id: String,
        sort: ReviewSort,
        result: Result<Vec<Review>, ApiError>,
    },
    VoteFinished {
        review_id: String,
        result: Result<VoteResult, ApiError>,
    },
    TaskSubmitted(Result<String, ApiError>),
    TaskProgress {
        task_id: String,
        message: String,
    },
    TaskFinished {
        task_id: String,
        result: Result<TaskStatus, PollError>,
    },
}

/// Main application state.
pub struct RouteShareApp {
    /// Current screen
    current_screen: Screen,
    /// UI theme
    theme: Theme,
    /// Application configuration
    config: AppConfig,
    /// Background runtime for HTTP requests
    runtime: tokio::runtime::Runtime,
    /// Site API client
    api: Arc<ApiClient>,
    /// For waking the UI when a background task finishes
    ctx: egui::Context,
    event_tx: Sender<AppEvent>,
    event_rx: Receiver<AppEvent>,
    /// Route listing, filters, selection and comparison
    browser: RouteBrowser,
    /// Clicked-marker track
    trace: RouteTrace,
    /// Pending map viewport, applied after the quiet period
    viewport: Debouncer<MapBounds>,
    /// Last viewport reported by the map widget
    last_viewport: Option<MapBounds>,
    /// Last viewport applied to the browser
    applied_viewport: Option<MapBounds>,
    browse_screen: RouteBrowserScreen,
    submit_screen: RouteSubmitScreen,
    reviews_screen: RouteReviewsScreen,
    /// Cancels the running job poll
    poll_cancel: Option<CancelHandle>,
}

impl RouteShareApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> anyhow::Result<Self> {
        let theme = config.ui.theme;
        cc.egui_ctx.set_visuals(theme.visuals());
        cc.egui_ctx.set_zoom_factor(config.ui.font_scale.clamp(0.5, 3.0));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("routeshare-io")
            .build()?;
        let api = Arc::new(ApiClient::new(&config.api)?);
        tracing::info!("Using site {}", api.base_url());

        let (event_tx, event_rx) = unbounded();

        let mut app = Self {
            current_screen: Screen::Browse,
            theme,
            viewport: Debouncer::new(config.map.debounce()),
            config,
            runtime,
            api,
            ctx: cc.egui_ctx.clone(),
            event_tx,
            event_rx,
            browser: RouteBrowser::new(),
            trace: RouteTrace::new(),
            last_viewport: None,
            applied_viewport: None,
            browse_screen: RouteBrowserScreen::new(),
            submit_screen: RouteSubmitScreen::new(),
            reviews_screen: RouteReviewsScreen::new(),
            poll_cancel: None,
        };
        app.load_routes();
        Ok(app)
    }

    /// Run `task` on the background runtime and deliver its event to the UI.
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.event_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            // Receiver lives as long as the app
            let _ = tx.send(event);
            ctx.request_repaint();
        });
    }

    fn load_routes(&mut self) {
        let seq = self.browser.begin_load();
        let api = self.api.clone();
        tracing::debug!("Loading routes (seq {})", seq);
        self.spawn(async move {
            let result = api.list_routes().await;
            AppEvent::Browser(BrowserMessage::Loaded { seq, result })
        });
    }

    fn start_comparison(&mut self) {
        let Some((seq, ids)) = self.browser.begin_compare() else {
            return;
        };
        tracing::info!("Comparing {} routes", ids.len());
        let api = self.api.clone();
        self.spawn(async move {
            let result = fetch_comparison(api.as_ref(), &ids).await;
            AppEvent::Browser(BrowserMessage::ComparisonLoaded { seq, result })
        });
    }

    fn fetch_trace(&self, request: Option<(u64, String)>) {
        let Some((seq, id)) = request else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move {
            let result = api.route_detail(&id).await;
            AppEvent::TraceLoaded { seq, result }
        });
    }

    fn current_zoom(&self) -> f64 {
        self.applied_viewport
            .or(self.last_viewport)
            .map_or(0.0, |b| b.zoom_level())
    }

    /// Process pending background events from the channel.
    fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Browser(message) => self.browser.update(message),
                AppEvent::TraceLoaded { seq, result } => self.trace.on_loaded(seq, result),
                AppEvent::ReviewsLoaded {
                    route_id,
                    sort,
                    result,
                } => {
                    if let Err(e) = &result {
                        tracing::warn!("Failed to load reviews for {}: {}", route_id, e);
                    }
                    self.reviews_screen
                        .set_reviews(&route_id, sort, result.map_err(|e| e.to_string()));
                }
                AppEvent::VoteFinished { review_id, result } => {
                    if let Err(e) = &result {
                        tracing::warn!("Vote on review {} failed: {}", review_id, e);
                    }
                    self.reviews_screen
                        .set_vote_result(&review_id, result.map_err(|e| e.to_string()));
                }
                AppEvent::TaskSubmitted(result) => self.on_task_submitted(result),
                AppEvent::TaskProgress { task_id, message } => {
                    if let JobStatus::Processing {
                        task_id: current,
                        message: shown,
                    } = &mut self.submit_screen.status
                    {
                        if *current == task_id {
                            *shown = message;
                        }
                    }
                }
                AppEvent::TaskFinished { task_id, result } => {
                    self.on_task_finished(task_id, result)
                }
            }
        }
    }

    /// Feed debounced viewport changes into the browser and the trace.
    fn process_viewport(&mut self, now: Instant) {
        if let Some(bounds) = self.viewport.poll(now) {
            self.applied_viewport = Some(bounds);
            self.browser.update(BrowserMessage::MapMoved(bounds));
            let request = self
                .trace
                .on_zoom(bounds.zoom_level(), self.config.map.trace_zoom_threshold);
            self.fetch_trace(request);
        }
        if let Some(wait) = self.viewport.time_until_due(now) {
            self.ctx.request_repaint_after(wait);
        }
    }

    fn handle_browser_action(&mut self, action: RouteBrowserAction, now: Instant) {
        match action {
            RouteBrowserAction::Message(message) => self.browser.update(message),
            RouteBrowserAction::Reload => self.load_routes(),
            RouteBrowserAction::Compare => self.start_comparison(),
            RouteBrowserAction::Viewport(bounds) => {
                if self.last_viewport != Some(bounds) {
                    self.last_viewport = Some(bounds);
                    self.viewport.push(bounds, now);
                }
            }
            RouteBrowserAction::MarkerClicked(id) => {
                let zoom = self.current_zoom();
                let request = self
                    .trace
                    .select(&id, zoom, self.config.map.trace_zoom_threshold);
                self.fetch_trace(request);
            }
            RouteBrowserAction::OpenReviews { route_id, name } => {
                self.navigate(Screen::Reviews);
                let action = self.reviews_screen.open(route_id, name);
                self.handle_reviews_action(action);
            }
        }
    }

    fn handle_reviews_action(&mut self, action: RouteReviewsAction) {
        match action {
            RouteReviewsAction::Navigate(screen) => self.navigate(screen),
            RouteReviewsAction::Load { route_id, sort } => {
                let api = self.api.clone();
                self.spawn(async move {
                    let result = api.reviews(&route_id, sort).await;
                    AppEvent::ReviewsLoaded {
                        route_id,
                        sort,
                        result,
                    }
                });
            }
            RouteReviewsAction::Vote {
                review_id,
                direction,
            } => {
                let api = self.api.clone();
                self.spawn(async move {
                    let result = api.vote(&review_id, direction).await;
                    AppEvent::VoteFinished { review_id, result }
                });
            }
        }
    }

    fn handle_submit_action(&mut self, action: RouteSubmitAction) {
        match action {
            RouteSubmitAction::BrowseFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("GPX", &["gpx"])
                    .pick_file()
                {
                    match load_gpx(&path) {
                        Ok(upload) => {
                            tracing::info!(
                                "Previewed {} ({} points)",
                                upload.preview.file_name,
                                upload.preview.point_count
                            );
                            self.submit_screen.set_upload(path, upload);
                        }
                        Err(e) => {
                            tracing::warn!("Rejected {}: {}", path.display(), e);
                            self.submit_screen.upload = None;
                            self.submit_screen.set_error(e.to_string());
                        }
                    }
                }
            }
            RouteSubmitAction::SubmitFile => {
                let Some(upload) = self.submit_screen.upload.clone() else {
                    return;
                };
                self.begin_submission();
                let api = self.api.clone();
                self.spawn(async move {
                    let result = api
                        .submit_file(&upload.preview.file_name, upload.contents)
                        .await;
                    AppEvent::TaskSubmitted(result)
                });
            }
            RouteSubmitAction::SubmitUrl(url) => {
                self.begin_submission();
                let api = self.api.clone();
                self.spawn(async move { AppEvent::TaskSubmitted(api.submit_url(&url).await) });
            }
            RouteSubmitAction::Cancel => {
                if let Some(handle) = self.poll_cancel.take() {
                    handle.cancel();
                }
            }
        }
    }

    fn begin_submission(&mut self) {
        self.submit_screen.error_message = None;
        self.submit_screen.status = JobStatus::Submitting;
    }

    fn on_task_submitted(&mut self, result: Result<String, ApiError>) {
        let task_id = match result {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Submission failed: {}", e);
                self.submit_screen.status = JobStatus::Failed(format!("Submission Error: {}", e));
                return;
            }
        };

        tracing::info!("Task {} accepted, polling", task_id);
        self.submit_screen.status = JobStatus::Processing {
            task_id: task_id.clone(),
            message: "Processing, please wait...".to_string(),
        };

        let (handle, cancel) = CancelHandle::new();
        if let Some(previous) = self.poll_cancel.replace(handle) {
            previous.cancel();
        }

        let api = self.api.clone();
        let poll_config = PollConfig::from(&self.config.polling);
        let progress_tx = self.event_tx.clone();
        let progress_ctx = self.ctx.clone();
        self.spawn(async move {
            let progress_id = task_id.clone();
            let result = poll_task(api.as_ref(), &task_id, poll_config, cancel, move |status| {
                let message = status
                    .status
                    .clone()
                    .unwrap_or_else(|| "Processing, please wait...".to_string());
                let _ = progress_tx.send(AppEvent::TaskProgress {
                    task_id: progress_id.clone(),
                    message,
                });
                progress_ctx.request_repaint();
            })
            .await;
            AppEvent::TaskFinished { task_id, result }
        });
    }

    fn on_task_finished(&mut self, task_id: String, result: Result<TaskStatus, PollError>) {
        let is_current = matches!(
            &self.submit_screen.status,
            JobStatus::Processing { task_id: current, .. } if *current == task_id
        );
        if !is_current {
            return;
        }
        self.poll_cancel = None;

        self.submit_screen.status = match result {
            Ok(status) => {
                tracing::info!("Task {} complete", task_id);
                JobStatus::Complete {
                    draft_id: status.draft_id(),
                }
            }
            Err(PollError::Cancelled) => {
                self.submit_screen
                    .set_error("Processing cancelled. The job may still finish on the website.");
                JobStatus::Idle
            }
            Err(e) => {
                tracing::warn!("Task {} did not complete: {}", task_id, e);
                JobStatus::Failed(e.to_string())
            }
        };
    }

    /// Navigate to a different screen.
    fn navigate(&mut self, screen: Screen) {
        tracing::debug!("Navigating from {:?} to {:?}", self.current_screen, screen);
        self.current_screen = screen;
    }

    /// Toggle the theme between dark and light and remember the choice.
    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme = self.theme.toggled();
        ctx.set_visuals(self.theme.visuals());

        self.config.ui.theme = self.theme;
        if let Err(e) = config::save_config(&self.config) {
            tracing::warn!("Failed to save config: {}", e);
        }
    }

    fn status_text(&self) -> String {
        match self.browser.load_state() {
            LoadState::Idle => "Idle".to_string(),
            LoadState::Loading => "Loading routes...".to_string(),
            LoadState::Loaded => format!("{} routes loaded", self.browser.all_routes().len()),
            LoadState::LoadFailed(_) => "Route listing unavailable".to_string(),
        }
    }
}

impl eframe::App for RouteShareApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Process background results each frame
        self.process_events();
        self.process_viewport(now);

        if self.submit_screen.status.is_busy() || self.browser.load_state() == &LoadState::Loading
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.browser.update(BrowserMessage::CloseComparison);
        }

        // Top panel with navigation
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("RouteShare");
                ui.separator();

                let mut tabs = vec![Screen::Browse, Screen::Submit];
                if !self.reviews_screen.route_id().is_empty() {
                    tabs.push(Screen::Reviews);
                }
                for screen in tabs {
                    if ui
                        .selectable_label(self.current_screen == screen, screen.label())
                        .clicked()
                    {
                        self.navigate(screen);
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_icon = match self.theme {
                        Theme::Dark => "🌙",
                        Theme::Light => "☀",
                    };
                    if ui
                        .button(theme_icon)
                        .on_hover_text(format!("{} theme", self.theme))
                        .clicked()
                    {
                        self.toggle_theme(ctx);
                    }
                });
            });
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
                ui.separator();
                ui.label(self.api.base_url());
                ui.separator();
                ui.label(self.status_text());
            });
        });

        // Main content area
        egui::CentralPanel::default().show(ctx, |ui| match self.current_screen {
            Screen::Browse => {
                let actions = self.browse_screen.show(ui, &self.browser, &self.trace);
                for action in actions {
                    self.handle_browser_action(action, now);
                }
            }
            Screen::Submit => {
                let site_url = self.api.base_url().to_string();
                if let Some(action) = self.submit_screen.show(ui, &site_url) {
                    self.handle_submit_action(action);
                }
            }
            Screen::Reviews => {
                if let Some(action) = self.reviews_screen.show(ui) {
                    self.handle_reviews_action(action);
                }
            }
        });

        // Routes filtered out of view lose their trace
        let visible = self.browser.visible().map(|r| r.id.as_str());
        self.trace.retain_visible(visible);

        // Comparison window (shown on top of everything)
        if show_comparison(ctx, self.browser.comparison()) {
            self.browser.update(BrowserMessage::CloseComparison);
        }
    }
}
