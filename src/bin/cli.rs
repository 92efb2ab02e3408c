use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wbs_hub::{
    Category, ExpandedTask, GenericTask, HubConfig, JournalStatus, LogicKind, Pendencia,
    PlanStore, SqlitePlanStore, TaskSelection, WbsSelection, WbsTemplate, WebhookClient, Wizard,
    WizardStep, load_templates, parse_items, save_payload_to_json, save_tasks_to_csv, summarize,
};

const CONFIG_ENV: &str = "WBS_HUB_CONFIG";

/// WBS choices being edited before they are handed to the wizard.
struct Draft {
    wbs_type: String,
    kind: LogicKind,
    code: String,
    project: String,
    selections: Vec<TaskSelection>,
    category: Option<String>,
    items: Vec<String>,
}

impl Draft {
    fn new(template: &WbsTemplate, code: &str, project: &str) -> Self {
        Self {
            wbs_type: template.wbs_type.clone(),
            kind: template.tipo_logica,
            code: code.to_string(),
            project: project.to_string(),
            selections: Vec::new(),
            category: None,
            items: Vec::new(),
        }
    }

    fn to_selection(&self, template: &WbsTemplate) -> Result<WbsSelection, String> {
        match self.kind {
            LogicKind::Percentual => Ok(WbsSelection::Percentual {
                wbs_type: self.wbs_type.clone(),
                code: self.code.clone(),
                project: self.project.clone(),
                selections: self.selections.clone(),
            }),
            LogicKind::Multiplicador => {
                let category = self
                    .category
                    .as_deref()
                    .and_then(|id| template.category(id))
                    .ok_or_else(|| "Choose a category first: category <id>".to_string())?;
                Ok(WbsSelection::Multiplicador {
                    wbs_type: self.wbs_type.clone(),
                    code: self.code.clone(),
                    project: self.project.clone(),
                    category: category.select(self.items.iter().cloned()),
                })
            }
        }
    }
}

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        let pad = widths[ci].saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad));
        line.push_str(" |");
    }
    line
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_generic_tasks(tasks: &[GenericTask]) -> String {
    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|t| {
            vec![
                t.nome.clone(),
                t.data.to_string(),
                format!("{:.1}", t.horas_previstas),
                format!("{:.1}", t.percentual_pendencia),
                t.dono_idx.map(|v| v.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    render_table(&["nome", "data", "horas", "percentual", "dono"], &rows)
}

fn render_wbs_tasks(tasks: &[ExpandedTask]) -> String {
    let summary = summarize(tasks);
    let mut out = format!("Preview ({} items to be created)\n", summary.total_items);
    for tarefa in summary.tarefas {
        out.push_str("  ");
        out.push_str(&tarefa);
        out.push('\n');
    }
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  templates                          List loaded WBS templates\n  show                               Show the wizard state\n  pendencia <pending_id> <os> <start> <deadline> <colaboradores> <subconjunto...>\n                                     Fill the pending item (dates YYYY-MM-DD)\n  confirm                            Confirm the current step\n  back                               Go back one step\n  use <wbs_type> <code> <project...> Start a WBS selection from a template\n  select <task_id> <dias>            Select a template task (percentual)\n  unselect <task_id>                 Remove a selected task\n  category <id>                      Choose a category (multiplicador)\n  items <text...>                    Set items, comma separated (multiplicador)\n  preview                            Preview the WBS tasks without confirming\n  export <json|csv> <path>           Save the payload (json) or WBS tasks (csv)\n  send [tasks|payload]               Post each WBS task (default) or the combined payload, then journal\n  journal                            Journal the payload without sending\n  plans                              List journaled plans\n  reset                              Start over\n  quit|exit                          Exit"
    );
}

fn print_templates(templates: &BTreeMap<String, WbsTemplate>) {
    if templates.is_empty() {
        println!("No templates loaded.");
        return;
    }
    for template in templates.values() {
        println!("  {:<16} {:<14} {}", template.wbs_type, template.tipo_logica, template.nome);
        match template.tipo_logica {
            LogicKind::Percentual => {
                for task in &template.tarefas {
                    println!("      {:>3}. {} ({} dias)", task.id, task.nome, task.dias_default);
                }
            }
            LogicKind::Multiplicador => {
                for category in &template.categorias {
                    print_category(category);
                }
            }
        }
    }
}

fn print_category(category: &Category) {
    println!(
        "      {:<20} {} ({} tasks per item)",
        category.id,
        category.nome,
        category.tarefas.len()
    );
}

fn print_state(wizard: &Wizard, draft: Option<&Draft>) {
    println!("Step               : {}", wizard.step());
    if let Some(p) = wizard.pendencia() {
        println!("Pending id         : {}", p.pending_id);
        println!("OS / subconjunto   : {} / {}", p.os, p.subconjunto);
        println!("Range              : {} .. {}", p.data_inicio, p.prazo_limite);
        println!("Colaboradores      : {}", p.colaboradores);
    }
    if !wizard.tasks_genericas().is_empty() {
        println!("{}", render_generic_tasks(wizard.tasks_genericas()));
    }
    if let Some(d) = draft {
        println!("WBS                : {} ({}) {} / {}", d.wbs_type, d.kind, d.code, d.project);
        for s in &d.selections {
            println!("  selected {}. {} - {} dias", s.id, s.nome, s.dias);
        }
        if let Some(category) = &d.category {
            println!("  category {} items [{}]", category, d.items.join(", "));
        }
    }
    if !wizard.wbs_tasks().is_empty() {
        print!("{}", render_wbs_tasks(wizard.wbs_tasks()));
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn load_config() -> HubConfig {
    let path = PathBuf::from(std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.yaml".into()));
    let config = if path.exists() {
        match HubConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                println!("Config error: {e}. Using defaults.");
                HubConfig::default()
            }
        }
    } else {
        HubConfig::default()
    };
    config.with_env_overrides()
}

fn journal(config: &HubConfig, wizard: &Wizard, status: JournalStatus, erro_msg: Option<&str>) {
    let payload = match wizard.payload() {
        Ok(p) => p,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };
    match SqlitePlanStore::new(&config.database_path)
        .and_then(|store| store.save_plan(&payload, status, erro_msg))
    {
        Ok(id) => println!("Journaled plan {id} ({status})."),
        Err(e) => println!("Journal error: {e}"),
    }
}

fn block_on<F: std::future::Future>(future: F) -> Option<F::Output> {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => Some(runtime.block_on(future)),
        Err(e) => {
            println!("Runtime error: {e}");
            None
        }
    }
}

/// Checks the endpoint and the review step, then builds the client.
fn prepare_send(config: &HubConfig, wizard: &Wizard) -> Option<WebhookClient> {
    if !config.endpoint_configured() {
        println!("Configure the webhook endpoint (make_endpoint or WBS_HUB_ENDPOINT) before sending.");
        return None;
    }
    if let Err(e) = wizard.payload() {
        println!("Error: {e}");
        return None;
    }
    match WebhookClient::from_config(config) {
        Ok(client) => Some(client),
        Err(e) => {
            println!("Webhook error: {e}");
            None
        }
    }
}

/// One POST per WBS task, waiting `request_delay` between posts.
fn send_tasks(config: &HubConfig, wizard: &Wizard) {
    let Some(client) = prepare_send(config, wizard) else {
        return;
    };
    let tasks = wizard.wbs_tasks();
    println!("Sending {} tasks to {}", tasks.len(), client.endpoint());
    let Some(report) = block_on(client.send_tasks(tasks, |done| {
        println!("Progress: {:.0}%", done * 100.0);
    })) else {
        return;
    };

    for result in &report.results {
        let status = result
            .status
            .map(|s| format!("HTTP {s}"))
            .unwrap_or_else(|| "no response".to_string());
        let mark = if result.ok { "ok" } else { "erro" };
        println!("  [{mark:<4}] {} ({status})", result.tarefa);
    }
    println!("{}", report.message);

    if report.ok {
        journal(config, wizard, JournalStatus::Ok, None);
    } else {
        journal(config, wizard, JournalStatus::ErroTasks, Some(&report.message));
    }
}

/// Single POST of the combined submission object.
fn send_payload(config: &HubConfig, wizard: &Wizard) {
    let Some(client) = prepare_send(config, wizard) else {
        return;
    };
    let payload = match wizard.payload() {
        Ok(p) => p,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };
    match block_on(client.send_payload(&payload)) {
        Some(Ok(())) => {
            println!(
                "Sent {} WBS tasks and {} generic tasks.",
                payload.wbs.len(),
                payload.tasks_genericas.len()
            );
            journal(config, wizard, JournalStatus::Ok, None);
        }
        Some(Err(e)) => {
            println!("Send failed: {e}");
            journal(config, wizard, JournalStatus::ErroTasks, Some(&e.to_string()));
        }
        None => {}
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let config = load_config();
    let templates = match load_templates(&config.templates_dir) {
        Ok(t) => t,
        Err(e) => {
            println!("Template error: {e}");
            BTreeMap::new()
        }
    };
    let mut wizard = Wizard::new(config.hours_per_person);
    let mut draft: Option<Draft> = None;

    println!("WBS Hub (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("[{}]> ", wizard.step());
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "templates" => print_templates(&templates),
            "show" => print_state(&wizard, draft.as_ref()),
            "pendencia" => {
                let args: Vec<&str> = parts.by_ref().take(5).collect();
                let subconjunto = parts.collect::<Vec<_>>().join(" ");
                if args.len() < 5 || subconjunto.is_empty() {
                    println!(
                        "Usage: pendencia <pending_id> <os> <start> <deadline> <colaboradores> <subconjunto...>"
                    );
                    continue;
                }
                let (Some(start), Some(deadline)) = (parse_date(args[2]), parse_date(args[3])) else {
                    println!("Invalid date (YYYY-MM-DD)");
                    continue;
                };
                let colaboradores: u32 = match args[4].parse() {
                    Ok(v) => v,
                    Err(_) => {
                        println!("Invalid colaboradores");
                        continue;
                    }
                };
                let pendencia = Pendencia {
                    pending_id: args[0].to_string(),
                    os: args[1].to_string(),
                    subconjunto,
                    data_inicio: start,
                    prazo_limite: deadline,
                    colaboradores,
                };
                match wizard.set_pendencia(pendencia) {
                    Ok(()) => println!("Pending item set."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "confirm" => match wizard.step() {
                WizardStep::Pendencia => match wizard.confirm_pendencia() {
                    Ok(tasks) => {
                        println!("Generated {} generic tasks.", tasks.len());
                        println!("{}", render_generic_tasks(tasks));
                    }
                    Err(e) => println!("Error: {e}"),
                },
                WizardStep::TasksGenericas => match wizard.confirm_tasks_genericas() {
                    Ok(()) => println!("Generic tasks confirmed. Choose a WBS template with 'use'."),
                    Err(e) => println!("Error: {e}"),
                },
                WizardStep::Wbs => {
                    let Some(d) = draft.as_ref() else {
                        println!("Error: choose a WBS template first");
                        continue;
                    };
                    let Some(template) = templates.get(&d.wbs_type) else {
                        println!("Unknown template '{}'", d.wbs_type);
                        continue;
                    };
                    let selection = match d.to_selection(template) {
                        Ok(s) => s,
                        Err(msg) => {
                            println!("{msg}");
                            continue;
                        }
                    };
                    if let Err(e) = wizard.set_wbs_selection(selection) {
                        println!("Error: {e}");
                        continue;
                    }
                    match wizard.confirm_wbs() {
                        Ok(tasks) => print!("{}", render_wbs_tasks(tasks)),
                        Err(e) => println!("Error: {e}"),
                    }
                }
                WizardStep::Review => {
                    println!("Review ready. Use 'send', 'journal' or 'export'.");
                }
            },
            "back" => println!("Back to step {}.", wizard.back()),
            "use" => {
                let wbs_type = parts.next();
                let code = parts.next();
                let project = parts.collect::<Vec<_>>().join(" ");
                match (wbs_type, code) {
                    (Some(wbs_type), Some(code)) if !project.is_empty() => match templates.get(wbs_type) {
                        Some(template) => {
                            draft = Some(Draft::new(template, code, &project));
                            println!("Using template '{}' ({}).", template.nome, template.tipo_logica);
                        }
                        None => println!("Unknown template '{wbs_type}'"),
                    },
                    _ => println!("Usage: use <wbs_type> <code> <project...>"),
                }
            }
            "select" | "unselect" => {
                let Some(d) = draft.as_mut() else {
                    println!("Error: choose a WBS template first");
                    continue;
                };
                if d.kind != LogicKind::Percentual {
                    println!("Template '{}' is not percentual", d.wbs_type);
                    continue;
                }
                let id: u32 = match parts.next().map(str::parse::<u32>) {
                    Some(Ok(v)) => v,
                    _ => {
                        println!("Usage: {cmd} <task_id>{}", if cmd == "select" { " <dias>" } else { "" });
                        continue;
                    }
                };
                d.selections.retain(|s| s.id != id);
                if cmd == "unselect" {
                    println!("Task {id} unselected.");
                    continue;
                }
                let Some(task) = templates.get(&d.wbs_type).and_then(|t| t.task(id)) else {
                    println!("Unknown task {id}");
                    continue;
                };
                let dias = match parts.next().map(str::parse::<i32>) {
                    Some(Ok(v)) => v,
                    None => task.dias_default,
                    Some(Err(_)) => {
                        println!("Invalid dias");
                        continue;
                    }
                };
                d.selections.push(task.select(dias));
                d.selections.sort_by_key(|s| s.id);
                println!("Selected {}. {} - {} dias", task.id, task.nome, dias);
            }
            "category" => {
                let Some(d) = draft.as_mut() else {
                    println!("Error: choose a WBS template first");
                    continue;
                };
                let Some(id) = parts.next() else {
                    println!("Usage: category <id>");
                    continue;
                };
                match templates.get(&d.wbs_type).and_then(|t| t.category(id)) {
                    Some(category) => {
                        d.category = Some(category.id.clone());
                        println!("Category '{}' selected.", category.nome);
                    }
                    None => println!("Unknown category '{id}'"),
                }
            }
            "items" => {
                let Some(d) = draft.as_mut() else {
                    println!("Error: choose a WBS template first");
                    continue;
                };
                let text = parts.collect::<Vec<_>>().join(" ");
                d.items = parse_items(&text);
                println!("{} items set.", d.items.len());
            }
            "preview" => {
                let Some(d) = draft.as_ref() else {
                    println!("Error: choose a WBS template first");
                    continue;
                };
                let Some(template) = templates.get(&d.wbs_type) else {
                    println!("Unknown template '{}'", d.wbs_type);
                    continue;
                };
                match d.to_selection(template).map(|s| s.expand()) {
                    Ok(Ok(tasks)) => print!("{}", render_wbs_tasks(&tasks)),
                    Ok(Err(e)) => println!("Error: {e}"),
                    Err(msg) => println!("{msg}"),
                }
            }
            "export" => {
                let (Some(format), Some(path)) = (parts.next(), parts.next()) else {
                    println!("Usage: export <json|csv> <path>");
                    continue;
                };
                let result = match format {
                    "json" => match wizard.payload() {
                        Ok(payload) => save_payload_to_json(&payload, path).map_err(|e| e.to_string()),
                        Err(e) => Err(e.to_string()),
                    },
                    "csv" => save_tasks_to_csv(wizard.wbs_tasks(), path).map_err(|e| e.to_string()),
                    other => Err(format!("Unknown format '{other}'")),
                };
                match result {
                    Ok(()) => println!("Exported to {path}"),
                    Err(e) => println!("Export error: {e}"),
                }
            }
            "send" => match parts.next() {
                None | Some("tasks") => send_tasks(&config, &wizard),
                Some("payload") => send_payload(&config, &wizard),
                Some(_) => println!("Usage: send [tasks|payload]"),
            },
            "journal" => journal(&config, &wizard, JournalStatus::Ok, None),
            "plans" => match SqlitePlanStore::new(&config.database_path).and_then(|s| s.list_plans()) {
                Ok(plans) if plans.is_empty() => println!("No plans journaled."),
                Ok(plans) => {
                    for plan in plans {
                        println!(
                            "  {:>4} {:<12} {:<10} {} wbs / {} generic",
                            plan.id,
                            plan.pending_id,
                            plan.status,
                            plan.payload.wbs.len(),
                            plan.payload.tasks_genericas.len()
                        );
                    }
                }
                Err(e) => println!("Journal error: {e}"),
            },
            "reset" => {
                wizard.reset();
                draft = None;
                println!("Wizard reset.");
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
