//! Route submission screen: upload a GPX file or submit a route URL.

use std::path::PathBuf;

use egui::{RichText, Ui};

use crate::jobs::{validate_route_url, GpxUpload};
use crate::ui::theme::status_colors;

/// Progress of the current submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JobStatus {
    #[default]
    Idle,
    /// Waiting for the site to accept the job
    Submitting,
    /// Job accepted, polling its status
    Processing { task_id: String, message: String },
    /// Job finished; the draft can be published on the website
    Complete { draft_id: Option<String> },
    Failed(String),
}

impl JobStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, JobStatus::Submitting | JobStatus::Processing { .. })
    }
}

/// Action from the submit screen.
#[derive(Debug, Clone)]
pub enum RouteSubmitAction {
    /// Open the native file picker
    BrowseFile,
    /// Upload the previewed file
    SubmitFile,
    /// Submit a validated URL
    SubmitUrl(String),
    /// Stop polling the current job
    Cancel,
}

/// Route submission screen state.
#[derive(Default)]
pub struct RouteSubmitScreen {
    /// Chosen file
    pub selected_file: Option<PathBuf>,
    /// Parsed file, ready to upload
    pub upload: Option<GpxUpload>,
    /// URL input
    pub route_url: String,
    /// Local validation or submission error
    pub error_message: Option<String>,
    pub status: JobStatus,
}

impl RouteSubmitScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the previewed file and clear previous state.
    pub fn set_upload(&mut self, path: PathBuf, upload: GpxUpload) {
        self.selected_file = Some(path);
        self.upload = Some(upload);
        self.error_message = None;
        self.status = JobStatus::Idle;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Show the screen.
    pub fn show(&mut self, ui: &mut Ui, site_url: &str) -> Option<RouteSubmitAction> {
        let mut action = None;
        let busy = self.status.is_busy();

        ui.heading("Add a Route");
        ui.label(
            RichText::new("Routes are processed on the website and appear as drafts to publish.")
                .weak(),
        );
        ui.add_space(12.0);

        ui.add_enabled_ui(!busy, |ui| {
            ui.group(|ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Upload a GPX file").strong());
                ui.horizontal(|ui| {
                    if ui.button("Choose file...").clicked() {
                        action = Some(RouteSubmitAction::BrowseFile);
                    }
                    match &self.selected_file {
                        Some(path) => ui.label(path.display().to_string()),
                        None => ui.label(RichText::new("No file selected").weak()),
                    };
                });

                if let Some(upload) = &self.upload {
                    let preview = &upload.preview;
                    egui::Grid::new("gpx_preview")
                        .num_columns(2)
                        .spacing([12.0, 4.0])
                        .show(ui, |ui| {
                            ui.label("Name");
                            ui.label(preview.name.as_deref().unwrap_or("(unnamed)"));
                            ui.end_row();
                            ui.label("Points");
                            ui.label(preview.point_count.to_string());
                            ui.end_row();
                            ui.label("Distance");
                            ui.label(format!("{:.1} km", preview.distance_km));
                            ui.end_row();
                            if let Some(range) = preview.elevation_range_m {
                                ui.label("Elevation range");
                                ui.label(format!("{:.0} m", range));
                                ui.end_row();
                            }
                        });
                }

                if ui
                    .add_enabled(self.upload.is_some(), egui::Button::new("Upload"))
                    .clicked()
                {
                    action = Some(RouteSubmitAction::SubmitFile);
                }
            });

            ui.add_space(8.0);

            ui.group(|ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Or import from a URL").strong());
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.route_url)
                            .hint_text("https://www.strava.com/routes/...")
                            .desired_width(380.0),
                    );
                    if ui.button("Submit").clicked() {
                        match validate_route_url(&self.route_url) {
                            Ok(url) => action = Some(RouteSubmitAction::SubmitUrl(url)),
                            Err(e) => self.error_message = Some(e.to_string()),
                        }
                    }
                });
            });
        });

        ui.add_space(12.0);

        if let Some(error) = &self.error_message {
            ui.colored_label(status_colors::ERROR, error.as_str());
        }

        match &self.status {
            JobStatus::Idle => {}
            JobStatus::Submitting => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Submitting...");
                });
            }
            JobStatus::Processing { message, .. } => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(message.as_str());
                    if ui.button("Cancel").clicked() {
                        action = Some(RouteSubmitAction::Cancel);
                    }
                });
            }
            JobStatus::Complete { draft_id } => {
                ui.colored_label(status_colors::SUCCESS, "Processing complete!");
                if let Some(id) = draft_id {
                    ui.hyperlink_to(
                        "Review and publish the draft on the website",
                        format!("{}/publish/{}", site_url, id),
                    );
                }
            }
            JobStatus::Failed(message) => {
                ui.colored_label(status_colors::ERROR, message.as_str());
            }
        }

        action
    }
}
