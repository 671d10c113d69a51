//! Group commands.

use super::confirm;
use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use group_api_client::{Group, GroupDraft, SortKey, SortOrder, ALL_CATEGORIES};
use page_controllers::{GroupDetails, GroupDetailsPage, GroupEditor, GroupsPage, MyGroupsPage};

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Search name, description and location
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this category ("All" for every category)
    #[arg(short, long)]
    pub category: Option<String>,

    /// newest, oldest, members, name or location
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<SortOrder>,
}

#[derive(Debug, Args)]
pub struct DraftArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub max_members: Option<u32>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub image_url: Option<String>,
}

impl DraftArgs {
    /// Overlay the given flags on `draft`.
    fn apply(self, draft: &mut GroupDraft) -> Result<()> {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(location) = self.location {
            draft.location = location;
        }
        if let Some(max_members) = self.max_members {
            draft.max_members = max_members;
        }
        if let Some(start_date) = self.start_date {
            draft.start_date = Some(parse_start_date(&start_date)?);
        }
        if let Some(image_url) = self.image_url {
            draft.image_url = image_url;
        }
        Ok(())
    }
}

fn parse_start_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| anyhow!("Invalid start date: {}", raw))
}

fn print_group_table(groups: &[Group]) {
    if groups.is_empty() {
        println!("No groups found");
        return;
    }
    println!(
        "{:<26} {:<28} {:<12} {:<16} {:<8} {}",
        "ID", "Name", "Category", "Location", "Members", "Starts"
    );
    println!("{}", "-".repeat(104));
    for group in groups {
        println!(
            "{:<26} {:<28} {:<12} {:<16} {:<8} {}",
            group.id,
            group.name,
            group.category,
            group.location,
            format!("{}/{}", group.member_count(), group.max_members),
            group.start_date.format("%Y-%m-%d %H:%M")
        );
    }
}

fn print_groups(groups: &[Group], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_group_table(groups),
        OutputFormat::Json => output::print_json(&groups)?,
    }
    Ok(())
}

fn print_details(details: &GroupDetails, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return output::print_json(details);
    }

    let group = &details.group;
    println!("{}", group.name);
    output::print_divider();
    output::print_row("ID", &group.id);
    output::print_row("Category", &group.category);
    output::print_row("Location", &group.location);
    output::print_row(
        "Members",
        &format!("{}/{}", group.member_count(), group.max_members),
    );
    output::print_row("Starts", &group.start_date.to_rfc3339());
    output::print_row(
        "Creator",
        group.creator.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
    );
    output::print_row("Status", if details.is_active { "upcoming" } else { "started" });
    output::print_row("Action", &format!("{:?}", details.action).to_lowercase());
    if !group.description.is_empty() {
        output::print_heading("About");
        println!("{}", group.description);
    }
    Ok(())
}

pub async fn groups_list(app: &App, args: ListArgs) -> Result<()> {
    let mut page = GroupsPage::new(app.pages.clone());
    page.query.search = args.search.unwrap_or_default();
    page.query.category = args.category.unwrap_or_else(|| ALL_CATEGORIES.to_string());
    if let Some(sort) = args.sort {
        page.query.sort = sort;
    }
    if let Some(order) = args.order {
        page.query.order = order;
    }

    page.load().await?;
    print_groups(&page.visible(), app.format)
}

pub async fn groups_show(app: &App, id: &str) -> Result<()> {
    let page = GroupDetailsPage::open(app.pages.clone(), id).await?;
    print_details(page.details(), app.format)
}

pub async fn groups_join(app: &App, id: &str) -> Result<()> {
    let mut page = GroupDetailsPage::open(app.pages.clone(), id).await?;
    let details = page.join().await?;
    print_details(details, app.format)
}

pub async fn groups_leave(app: &App, id: &str) -> Result<()> {
    let mut page = GroupDetailsPage::open(app.pages.clone(), id).await?;
    let details = page.leave().await?;
    print_details(details, app.format)
}

pub async fn groups_delete(app: &App, id: &str, yes: bool) -> Result<()> {
    let page = GroupDetailsPage::open(app.pages.clone(), id).await?;
    if !yes && !confirm("Are you sure you want to delete this group? This action cannot be undone.") {
        println!("Cancelled");
        return Ok(());
    }
    page.delete().await?;
    Ok(())
}

pub async fn groups_create(app: &App, args: DraftArgs) -> Result<()> {
    let mut editor = GroupEditor::create(app.pages.clone()).await?;
    args.apply(&mut editor.draft)?;
    let group = editor.submit().await?;
    match app.format {
        OutputFormat::Text => output::print_row("ID", &group.id),
        OutputFormat::Json => output::print_json(&group)?,
    }
    Ok(())
}

pub async fn groups_update(app: &App, id: &str, args: DraftArgs) -> Result<()> {
    let mut editor = GroupEditor::edit(app.pages.clone(), id).await?;
    args.apply(&mut editor.draft)?;
    let group = editor.submit().await?;
    if app.format == OutputFormat::Json {
        output::print_json(&group)?;
    }
    Ok(())
}

pub async fn my_groups(app: &App) -> Result<()> {
    let page = MyGroupsPage::open(app.pages.clone()).await?;
    print_groups(page.groups(), app.format)
}
