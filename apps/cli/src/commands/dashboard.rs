use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use page_controllers::{featured_groups, load_dashboard};

/// Catalog-wide numbers and the user's most recent groups.
pub async fn dashboard(app: &App) -> Result<()> {
    let view = load_dashboard(&app.pages).await?;

    match app.format {
        OutputFormat::Json => output::print_json(&view)?,
        OutputFormat::Text => {
            output::print_heading("Dashboard");
            output::print_row("Total groups", &view.stats.total_groups.to_string());
            output::print_row("My groups", &view.stats.my_groups.to_string());
            output::print_row("Total members", &view.stats.total_members.to_string());
            output::print_row("Upcoming", &view.stats.upcoming_events.to_string());

            output::print_heading("Recent groups");
            if view.recent().is_empty() {
                println!("You haven't created or joined any groups yet");
                let featured = featured_groups(&app.pages).await;
                if !featured.is_empty() {
                    output::print_heading("Featured groups");
                    for group in featured {
                        println!("  {:<26} {}", group.id, group.name);
                    }
                }
            }
            for group in view.recent() {
                println!("  {:<26} {}", group.id, group.name);
            }
        }
    }
    Ok(())
}
