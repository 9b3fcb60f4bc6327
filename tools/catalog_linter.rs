/// Catalog Linter: checks comment templates for placeholder and condition problems.
///
/// Usage: catalog_linter [<catalog.ron | dir>...]
///
/// With no paths, the built-in catalog is linted. Each given file or
/// directory is merged over the built-in catalog first.

use baseball_narrative::core::catalog::{Catalog, CommentTemplate};
use baseball_narrative::core::condition::{Clause, Condition, ConditionSpec};
use baseball_narrative::core::template::Placeholder;
use baseball_narrative::schema::comment::Category;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::process;

const MIN_PER_CATEGORY: usize = 3;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().skip(1).any(|a| a == "--help" || a == "-h") {
        println!("Usage: catalog_linter [<catalog.ron | dir>...]");
        process::exit(0);
    }

    let mut catalog = match Catalog::builtin() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: Built-in catalog is broken: {}", e);
            process::exit(1);
        }
    };

    for arg in &args[1..] {
        let path = Path::new(arg);
        if path.is_file() {
            match Catalog::load_from_ron(path) {
                Ok(c) => catalog.merge(c),
                Err(e) => {
                    eprintln!("ERROR: Failed to load catalog file: {}", e);
                    process::exit(1);
                }
            }
        } else if path.is_dir() {
            load_catalogs_recursive(path, &mut catalog);
        } else {
            eprintln!("ERROR: Path '{}' does not exist", arg);
            process::exit(1);
        }
    }

    println!("Loaded {} comment templates", catalog.len());

    let Report {
        errors,
        warnings,
        notes,
    } = lint_catalog(&catalog);

    println!("\n=== Catalog Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    // Free-text clauses are settled by the unrecognized-condition policy.
    for note in &notes {
        println!("NOTE: {}", note);
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings, {} notes",
        errors.len(),
        warnings.len(),
        notes.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_catalogs_recursive(dir: &Path, catalog: &mut Catalog) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_catalogs_recursive(&path, catalog);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match Catalog::load_from_ron(&path) {
                    Ok(c) => {
                        println!("  Loaded: {}", path.display());
                        catalog.merge(c);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct Report {
    errors: Vec<String>,
    warnings: Vec<String>,
    notes: Vec<String>,
}

fn describe(clause: &Clause) -> String {
    match clause {
        Clause::Known(condition) => format!("{:?}", condition),
        Clause::Unrecognized(text) => format!("'{}'", text),
    }
}

fn result_check(category: Category) -> Option<Condition> {
    match category {
        Category::HomeRun => Some(Condition::HomeRunResult),
        Category::Strikeout => Some(Condition::StrikeoutResult),
        _ => None,
    }
}

fn lint_template(template: &CommentTemplate, report: &mut Report) {
    let id = template.id;

    if template.body.segments.is_empty() {
        report.errors.push(format!("Template {} has an empty body", id));
    }

    for token in template.body.unknown_tokens() {
        report
            .errors
            .push(format!("Template {} uses unknown placeholder {{{}}}", id, token));
    }

    for fragment in template.condition.unrecognized() {
        report.notes.push(format!(
            "Template {} has an unrecognized condition clause: '{}'",
            id, fragment
        ));
    }

    if template.body.uses(Placeholder::HrType) && template.category != Category::HomeRun {
        report.warnings.push(format!(
            "Template {} uses {{HR_TYPE}} outside the {} category",
            id,
            Category::HomeRun
        ));
    }

    if let Some(required) = result_check(template.category) {
        if !template.condition.conditions().any(|c| c == required) {
            report.warnings.push(format!(
                "Template {} ({}) never checks {:?}",
                id, template.category, required
            ));
        }
    }

    // The evaluated clauses and the label must describe the same rule.
    let described = ConditionSpec::from_label(&template.condition.label).clauses;
    let evaluated = &template.condition.clauses;
    for clause in described.iter().filter(|c| !evaluated.contains(c)) {
        report.warnings.push(format!(
            "Template {}: label describes {} but it is not evaluated",
            id,
            describe(clause)
        ));
    }
    for clause in evaluated.iter().filter(|c| !described.contains(c)) {
        report.warnings.push(format!(
            "Template {}: evaluates {} which the label does not describe",
            id,
            describe(clause)
        ));
    }
}

fn lint_catalog(catalog: &Catalog) -> Report {
    let mut report = Report::default();

    for template in catalog.iter() {
        lint_template(template, &mut report);
    }

    // Coverage analysis: every category needs a few templates to rotate through
    let mut per_category: FxHashMap<Category, usize> = FxHashMap::default();
    for template in catalog.iter() {
        *per_category.entry(template.category).or_insert(0) += 1;
    }
    for category in Category::ALL {
        let count = per_category.get(&category).copied().unwrap_or(0);
        if count < MIN_PER_CATEGORY {
            report.warnings.push(format!(
                "Category {} has {} template(s), fewer than {}",
                category, count, MIN_PER_CATEGORY
            ));
        }
    }

    report
}
