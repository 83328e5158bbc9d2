use std::sync::Arc;

use clap::Args;
use complaint_desk::complaints::{
    to_csv, Actor, ComplaintDraft, ComplaintFilter, ComplaintService, ExportRow, Role,
    StatsService, UserDirectory, UserId, UserProfile,
};
use complaint_desk::error::AppError;

use crate::infra::{InMemoryComplaintRepository, InMemoryUserDirectory};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Filter the admin listing portion by category label (e.g. Technical)
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Skip the CSV export portion of the demo
    #[arg(long)]
    pub(crate) skip_export: bool,
}

fn account(id: &str, role: Role, name: &str, email: &str) -> (Actor, UserProfile) {
    let actor = Actor {
        id: UserId(id.to_string()),
        role,
    };
    let profile = UserProfile {
        id: actor.id.clone(),
        name: name.to_string(),
        email: email.to_string(),
    };
    (actor, profile)
}

fn draft(category: &str, description: &str, priority: Option<&str>) -> ComplaintDraft {
    ComplaintDraft {
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        priority: priority.map(str::to_string),
    }
}

pub(crate) fn run_demo(args: &DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryComplaintRepository::default());
    let directory = InMemoryUserDirectory::default();
    let complaints = ComplaintService::new(repository.clone());
    let stats = StatsService::new(repository);

    let (admin, admin_profile) = account("adm-1", Role::Admin, "Asha Admin", "asha@example.net");
    let (rita, rita_profile) = account("usr-1", Role::User, "Rita Reporter", "rita@example.net");
    let (omar, omar_profile) = account("usr-2", Role::User, "Omar Osei", "omar@example.net");
    directory.register(admin_profile);
    directory.register(rita_profile);
    directory.register(omar_profile);

    println!("Complaint desk demo");

    println!("\nIntake");
    let submissions = [
        (&rita, draft("Technical", "Network down in lab 3", Some("High"))),
        (
            &rita,
            draft("Billing", "Charged twice for the March invoice", None),
        ),
        (
            &omar,
            draft(
                "Service",
                "Cafeteria queue blocks the lobby, every noon",
                Some("Low"),
            ),
        ),
        (
            &omar,
            draft(
                "Infrastructure",
                "Elevator B rattles\nbetween floors 3 and 4",
                Some("High"),
            ),
        ),
    ];

    let mut filed = Vec::new();
    for (actor, submission) in submissions {
        match complaints.submit(actor, submission) {
            Ok(complaint) => {
                println!(
                    "- {} filed {} -> {} / {} ({})",
                    actor.id.0,
                    complaint.id.display(),
                    complaint.category.label(),
                    complaint.priority.label(),
                    complaint.status.label()
                );
                filed.push(complaint);
            }
            Err(err) => println!("- submission rejected: {err}"),
        }
    }

    let Some(first) = filed.first() else {
        println!("No complaints were filed; stopping the demo here.");
        return Ok(());
    };

    println!("\nTriage");
    for target in ["In Progress", "Resolved"] {
        match complaints.update_status(&admin, &first.id, target) {
            Ok(updated) => println!(
                "- admin moved {} to {}",
                updated.id.display(),
                updated.status.label()
            ),
            Err(err) => println!("- triage unavailable: {err}"),
        }
    }
    match complaints.update_status(&rita, &first.id, "Pending") {
        Ok(_) => println!("- unexpected: a reporter changed a status"),
        Err(err) => println!("- reporter update rejected: {err}"),
    }

    println!("\nListings");
    match complaints.list_own(&rita, ComplaintFilter::default()) {
        Ok(own) => println!("- {} sees {} of their own complaints", rita.id.0, own.len()),
        Err(err) => println!("- listing unavailable: {err}"),
    }

    let filter = ComplaintFilter {
        category: args.category.clone(),
        ..ComplaintFilter::default()
    };
    match complaints.list(&admin, filter) {
        Ok(all) => {
            match &args.category {
                Some(category) => println!("- admin listing filtered to {category}:"),
                None => println!("- admin listing, newest first:"),
            }
            for complaint in &all {
                println!(
                    "  - {} | {} | {} | {}",
                    complaint.id.display(),
                    complaint.category.label(),
                    complaint.status.label(),
                    complaint.date
                );
            }
        }
        Err(err) => println!("- listing unavailable: {err}"),
    }

    println!("\nStatistics");
    match stats.all() {
        Ok(snapshot) => {
            println!(
                "- {} total | {} pending | {} resolved",
                snapshot.total, snapshot.pending, snapshot.resolved
            );
            for (label, count) in snapshot
                .category_distribution
                .labels
                .iter()
                .zip(snapshot.category_distribution.data.iter())
            {
                println!("  - {label}: {count}");
            }
        }
        Err(err) => println!("- statistics unavailable: {err}"),
    }

    if args.skip_export {
        return Ok(());
    }

    println!("\nCSV export");
    let rows: Vec<ExportRow> = match complaints.list(&admin, ComplaintFilter::default()) {
        Ok(all) => all
            .into_iter()
            .map(|complaint| {
                let owner = directory
                    .lookup(&complaint.owner_id)
                    .ok()
                    .flatten();
                ExportRow { complaint, owner }
            })
            .collect(),
        Err(err) => {
            println!("- export unavailable: {err}");
            return Ok(());
        }
    };
    match to_csv(&rows) {
        Ok(table) => {
            for line in table.lines() {
                println!("  {line}");
            }
        }
        Err(err) => println!("- export unavailable: {err}"),
    }

    Ok(())
}
