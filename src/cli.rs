use crate::{
    api::UserApi,
    config::Config,
    detail::DetailView,
    form::{FormMode, Submit, UserForm},
    list::{DeleteOutcome, ListView},
    model::User,
    prompt::TerminalConfirm,
    route::Route,
    session::SessionLog,
    validate::Field,
    Args,
};
use anyhow::{anyhow, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;

const SUBMIT_FAILED: &str = "Failed to submit the form. Please try again.";

pub struct Context {
    pub args: Args,
    pub config: Config,
    pub api: Box<dyn UserApi>,
    pub confirm: TerminalConfirm,
    pub session: RefCell<SessionLog>,
    pub route: RefCell<Route>,
    pub home: RefCell<ListView>,
}

fn verbose(ctx: &Context, message: &str) {
    if ctx.args.verbose || ctx.args.debug {
        eprintln!("[VERBOSE] {}", message);
    }
}

fn request_failed(ctx: &Context, op: &str, err: &anyhow::Error) {
    verbose(ctx, &format!("{} failed: {}", op, err));
    let _ = ctx
        .session
        .borrow_mut()
        .request_failed(op, &err.to_string());
}

pub fn run_once(ctx: &Context, line: &str) -> Result<()> {
    let words = shell_words::split(line)?;
    let is_navigation = words
        .first()
        .is_some_and(|w| w.starts_with('/') || w == "open" || w == "back");
    if !is_navigation {
        // Row actions need the list, as they would on the list page.
        mount_home(ctx);
    }
    handle_line(ctx, line, None)?;
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("userdeck - type help for commands, /exit to quit");
    navigate(&ctx, Route::Home);

    loop {
        let prompt = format!("{} > ", ctx.route.borrow());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match handle_line(&ctx, line, Some(&mut rl)) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Run one command line. Returns true when the session should end.
fn handle_line(ctx: &Context, line: &str, rl: Option<&mut DefaultEditor>) -> Result<bool> {
    let words = shell_words::split(line)?;
    let Some((cmd, rest)) = words.split_first() else {
        return Ok(false);
    };

    if let Some(route) = Route::parse(cmd) {
        navigate(ctx, route);
        return Ok(false);
    }

    match cmd.as_str() {
        "/exit" | "/quit" | "exit" | "quit" => return Ok(true),
        "/help" | "help" => print_help(),
        "/session" => {
            let session = ctx.session.borrow();
            println!("Session: {}", session.session_id());
            match &session.path {
                Some(path) => println!("Log: {}", path.display()),
                None => println!("Log: disabled"),
            }
            println!("API: {}", ctx.config.api.base_url);
            let home = ctx.home.borrow();
            println!("Users in list: {}", home.users().len());
            match (home.is_create_open(), home.editing()) {
                (true, _) => println!("Open form: create"),
                (false, Some(id)) => println!("Open form: edit user {}", id),
                (false, None) => println!("Open form: none"),
            }
        }
        "open" => {
            let id = rest.first().ok_or_else(|| anyhow!("Missing user id"))?;
            navigate(ctx, Route::User(id.clone()));
        }
        "back" => navigate(ctx, Route::Home),
        "reload" => {
            let route = ctx.route.borrow().clone();
            navigate(ctx, route);
        }
        "create" => create_user(ctx, rest, rl)?,
        "edit" => {
            let id = parse_id(rest)?;
            edit_user(ctx, id, &rest[1..], rl)?;
        }
        "delete" => delete_user(ctx, parse_id(rest)?),
        other if other.starts_with('/') => println!("Unknown route: {}", other),
        other => println!("Unknown command: {}. Type help for commands.", other),
    }
    Ok(false)
}

fn print_help() {
    println!("Navigation:");
    println!("  /  or /home              - list all users");
    println!("  /user/<id>  or open <id> - show one user");
    println!("  back                     - return to the list");
    println!("  reload                   - fetch the current page again");
    println!("Users:");
    println!("  create [field=value ...] - create a user (prompts if no fields given)");
    println!("  edit <id> [field=value ...] - edit a user from the list");
    println!("  delete <id>              - delete a user (asks first)");
    println!("  fields: name email phone street city company website");
    println!("Session:");
    println!("  /session                 - show session info");
    println!("  /help                    - show commands");
    println!("  /exit                    - quit");
}

fn parse_id(args: &[String]) -> Result<u64> {
    let raw = args.first().ok_or_else(|| anyhow!("Missing user id"))?;
    raw.parse()
        .map_err(|_| anyhow!("Invalid user id: {}", raw))
}

fn navigate(ctx: &Context, route: Route) {
    let _ = ctx.session.borrow_mut().navigate(&route);
    *ctx.route.borrow_mut() = route.clone();

    match route {
        Route::Home => {
            mount_home(ctx);
            print!("{}", ctx.home.borrow().render());
        }
        Route::User(id) => {
            let mut view = DetailView::new(&id);
            print!("{}", view.render());
            verbose(ctx, &format!("GET /users/{}", id));
            match view.mount(ctx.api.as_ref()) {
                Ok(()) => {
                    let _ = ctx.session.borrow_mut().user_loaded(&id);
                }
                Err(e) => request_failed(ctx, "get_user", &e),
            }
            print!("{}", view.render());
        }
    }
}

fn mount_home(ctx: &Context) {
    verbose(ctx, "GET /users");
    let result = ctx.home.borrow_mut().mount(ctx.api.as_ref());
    match result {
        Ok(count) => {
            let _ = ctx.session.borrow_mut().users_loaded(count);
        }
        Err(e) => request_failed(ctx, "list_users", &e),
    }
}

fn create_user(ctx: &Context, assignments: &[String], rl: Option<&mut DefaultEditor>) -> Result<()> {
    ctx.home.borrow_mut().open_create()?;
    let form = UserForm::create();
    let saved = run_form(ctx, form, assignments, rl);
    match saved {
        Ok(Some(user)) => {
            println!("Created user {} ({})", user.id, user.username);
            let _ = ctx
                .session
                .borrow_mut()
                .user_created(user.id, &user.username);
            ctx.home.borrow_mut().apply_created(user);
            show_list_if_home(ctx);
            Ok(())
        }
        other => {
            ctx.home.borrow_mut().close_create();
            other.map(|_| ())
        }
    }
}

fn edit_user(
    ctx: &Context,
    id: u64,
    assignments: &[String],
    rl: Option<&mut DefaultEditor>,
) -> Result<()> {
    let user = ctx.home.borrow_mut().open_edit(id)?;
    let form = UserForm::edit(&user);
    let saved = run_form(ctx, form, assignments, rl);
    match saved {
        Ok(Some(user)) => {
            println!("Updated user {}", user.id);
            let _ = ctx.session.borrow_mut().user_updated(user.id);
            ctx.home.borrow_mut().apply_updated(user);
            show_list_if_home(ctx);
            Ok(())
        }
        other => {
            ctx.home.borrow_mut().close_edit();
            other.map(|_| ())
        }
    }
}

fn delete_user(ctx: &Context, id: u64) {
    verbose(ctx, &format!("DELETE /users/{}", id));
    let result = ctx
        .home
        .borrow_mut()
        .delete(ctx.api.as_ref(), id, &ctx.confirm);
    match result {
        Ok(DeleteOutcome::Deleted) => {
            println!("Deleted user {}", id);
            let _ = ctx.session.borrow_mut().user_deleted(id);
        }
        Ok(DeleteOutcome::Cancelled) => {
            let _ = ctx.session.borrow_mut().delete_cancelled(id);
        }
        Err(e) => {
            if let Some(message) = ctx.home.borrow().error() {
                eprintln!("{}", message);
            }
            request_failed(ctx, "delete_user", &e);
        }
    }
    show_list_if_home(ctx);
}

fn show_list_if_home(ctx: &Context) {
    if *ctx.route.borrow() == Route::Home {
        print!("{}", ctx.home.borrow().render());
    }
}

/// Drive a form to a saved record, or `None` when it was abandoned.
///
/// With assignments the form is filled and submitted once. Without, the
/// fields are prompted for interactively until submit succeeds or the user
/// cancels.
fn run_form(
    ctx: &Context,
    mut form: UserForm,
    assignments: &[String],
    rl: Option<&mut DefaultEditor>,
) -> Result<Option<User>> {
    if !assignments.is_empty() {
        form.apply_assignments(assignments)?;
        return Ok(submit_form(ctx, &mut form));
    }

    let Some(rl) = rl else {
        return Err(anyhow!(
            "No fields given. Use field=value pairs, e.g. name=\"Ada Lovelace\""
        ));
    };

    if !prompt_fields(&mut form, rl)? {
        return Ok(None);
    }
    loop {
        print!("{}", form.render());
        let choice = format!("[s]ubmit ({}), [e]dit, [c]ancel: ", form.submit_label());
        match rl.readline(&choice) {
            Ok(answer) => match answer.trim().to_lowercase().as_str() {
                "" | "s" | "submit" => {
                    if let Some(user) = submit_form(ctx, &mut form) {
                        return Ok(Some(user));
                    }
                }
                "e" | "edit" => {
                    if !prompt_fields(&mut form, rl)? {
                        return Ok(None);
                    }
                }
                "c" | "cancel" => return Ok(None),
                other => println!("Unknown choice: {}", other),
            },
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(None),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Prompt every editable field with its current value. False means cancelled.
fn prompt_fields(form: &mut UserForm, rl: &mut DefaultEditor) -> Result<bool> {
    println!("{} (Ctrl-C to cancel)", form.title());
    println!("  Username: {} (read-only)", form.fields().username);
    for field in Field::ALL.into_iter().filter(Field::editable) {
        let marker = if field.required() { "*" } else { "" };
        let prompt = format!("  {}{}: ", field.label(), marker);
        let current = form.fields().get(field).to_string();
        match rl.readline_with_initial(&prompt, (&current, "")) {
            Ok(value) => form.set(field, &value)?,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(false),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Submit once. Validation errors and transport failures are reported here
/// and leave the form as it was.
fn submit_form(ctx: &Context, form: &mut UserForm) -> Option<User> {
    let target = match form.mode() {
        FormMode::Edit(user) => format!("PUT /users/{}", user.id),
        FormMode::Create => "POST /users".to_string(),
    };
    verbose(ctx, &target);
    match form.submit(ctx.api.as_ref()) {
        Ok(Submit::Saved(user)) => Some(user),
        Ok(Submit::Invalid(errors)) => {
            let fields: Vec<&str> = errors.fields().iter().map(Field::key).collect();
            let _ = ctx.session.borrow_mut().validation_failed(&fields);
            for (field, message) in errors.iter() {
                println!("  {}: {}", field.label(), message);
            }
            None
        }
        Err(e) => {
            eprintln!("{}", SUBMIT_FAILED);
            request_failed(ctx, "submit_user", &e);
            None
        }
    }
}
