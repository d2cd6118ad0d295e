use std::path::PathBuf;
use std::time::Duration;

use bookshelf::net::types::{BookRequest, FeedbackRequest, FeedbackStatus, RegisterRequest};
use bookshelf::state::feedback::{FeedbackSort, FeedbackTab, PAGE_SIZE as FEEDBACK_PAGE_SIZE};
use bookshelf::state::my_books::BookTab;
use bookshelf::{ApiError, Bookshelf, ClientConfig, ConfigError, Route};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("not signed in; run `bookshelf login` first")]
    NotSignedIn,
    #[error("timed out waiting for search results")]
    Timeout,
}

#[derive(Parser, Debug)]
#[command(name = "bookshelf", about = "Personal book library client")]
struct Cli {
    #[arg(long, env = "BOOKSHELF_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "BOOKSHELF_STORAGE_PATH")]
    storage_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BOOKSHELF_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Register(RegisterArgs),
    /// Exchange an identity-widget credential for a session.
    Google {
        #[arg(long)]
        credential: String,
    },
    Logout,
    Whoami,
    /// Recommended shareable books and, when signed in, reading stats.
    Dashboard,
    Books(BooksCommand),
    Feedback(FeedbackCommand),
    Profile(ProfileCommand),
    /// Look up volumes on the external catalogue.
    Search {
        query: String,
    },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    firstname: String,
    #[arg(long)]
    lastname: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "BOOKSHELF_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args, Debug)]
struct BooksCommand {
    #[command(subcommand)]
    command: BooksSubcommand,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TabArg {
    Owned,
    Returned,
    Borrowed,
    Requested,
}

impl From<TabArg> for BookTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Owned => BookTab::Owned,
            TabArg::Returned => BookTab::Returned,
            TabArg::Borrowed => BookTab::Borrowed,
            TabArg::Requested => BookTab::Requested,
        }
    }
}

#[derive(Args, Debug)]
struct BookFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long, default_value = "")]
    isbn: String,
    #[arg(long)]
    synopsis: Option<String>,
    #[arg(long)]
    genre: Option<String>,
    #[arg(long)]
    cover_url: Option<String>,
    #[arg(long, default_value_t = false)]
    shareable: bool,
}

impl From<BookFields> for BookRequest {
    fn from(fields: BookFields) -> Self {
        BookRequest {
            title: fields.title,
            author_name: fields.author,
            isbn: fields.isbn,
            synopsis: fields.synopsis,
            genre: fields.genre,
            cover_url: fields.cover_url,
            shareable: fields.shareable,
        }
    }
}

#[derive(Subcommand, Debug)]
enum BooksSubcommand {
    List {
        #[arg(long, value_enum, default_value_t = TabArg::Owned)]
        tab: TabArg,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Get {
        id: i64,
    },
    Create(BookFields),
    Update {
        id: i64,
        #[command(flatten)]
        fields: BookFields,
    },
    Delete {
        id: i64,
    },
    /// Ask the owner to lend a shareable book.
    Request {
        id: i64,
    },
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
    },
    /// Toggle whether a book is shareable.
    Share {
        id: i64,
    },
    /// Toggle whether a book is archived.
    Archive {
        id: i64,
    },
    /// Hand a borrowed book back.
    Return {
        id: i64,
    },
    ApproveReturn {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct FeedbackCommand {
    #[command(subcommand)]
    command: FeedbackSubcommand,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Newest,
    Upvoted,
    Comments,
}

impl From<SortArg> for FeedbackSort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Newest => FeedbackSort::Newest,
            SortArg::Upvoted => FeedbackSort::MostUpvoted,
            SortArg::Comments => FeedbackSort::MostComments,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    New,
    InProgress,
    Resolved,
    Closed,
}

impl From<StatusArg> for FeedbackStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::New => FeedbackStatus::New,
            StatusArg::InProgress => FeedbackStatus::InProgress,
            StatusArg::Resolved => FeedbackStatus::Resolved,
            StatusArg::Closed => FeedbackStatus::Closed,
        }
    }
}

#[derive(Subcommand, Debug)]
enum FeedbackSubcommand {
    List {
        #[arg(long, default_value_t = false)]
        mine: bool,
        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
        #[arg(long, value_enum, conflicts_with = "mine")]
        status: Option<StatusArg>,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    Show {
        id: i64,
    },
    Submit {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    Edit {
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    Delete {
        id: i64,
    },
    Upvote {
        id: i64,
    },
    Comment {
        id: i64,
        #[arg(long)]
        message: String,
    },
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show,
    Dashboard,
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let app = Bookshelf::open(config)?;

    let is_logout = matches!(cli.command, Command::Logout);
    let outcome = run(&app, cli.command).await;
    if outcome.is_ok() && !is_logout {
        report_redirect(&app);
    }
    outcome
}

/// Flags win over the environment; clap has already merged `env =` values.
fn load_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let api_url = cli.api_url.clone();
    let storage_path = cli
        .storage_path
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    ClientConfig::from_lookup(move |key| match key {
        "BOOKSHELF_API_URL" => api_url.clone(),
        "BOOKSHELF_STORAGE_PATH" => storage_path.clone(),
        other => std::env::var(other).ok(),
    })
}

async fn run(app: &Bookshelf, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let mut view = app.login();
            if !view.sign_in(&email, &password).await {
                return Err(rejected(view.state().error.clone()));
            }
            println!("signed in as {}", email.trim());
            Ok(())
        }
        Command::Register(args) => {
            let request = RegisterRequest {
                firstname: args.firstname,
                lastname: args.lastname,
                email: args.email,
                password: args.password,
            };
            let mut view = app.register();
            if !view.register(&request).await {
                return Err(rejected(view.state().error.clone()));
            }
            println!("registered {}", request.email.trim());
            Ok(())
        }
        Command::Google { credential } => {
            let mut view = app.login();
            if !view.sign_in_with_google(&credential).await {
                return Err(rejected(view.state().error.clone()));
            }
            let email = app.auth().current_user().map(|s| s.email).unwrap_or_default();
            println!("signed in as {email}");
            Ok(())
        }
        Command::Logout => {
            app.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            match app.auth().current_user() {
                Some(session) => println!("{}", session.email),
                None => println!("not signed in"),
            }
            Ok(())
        }
        Command::Dashboard => run_dashboard(app).await,
        Command::Books(books) => run_books(app, books).await,
        Command::Feedback(feedback) => run_feedback(app, feedback).await,
        Command::Profile(profile) => run_profile(app, profile).await,
        Command::Search { query } => run_search(app, &query).await,
    }
}

async fn run_dashboard(app: &Bookshelf) -> Result<(), CliError> {
    let mut view = app.dashboard();
    view.load().await;
    let state = view.state();
    if let Some(error) = &state.error {
        return Err(CliError::Rejected(error.clone()));
    }
    print_json(&serde_json::json!({
        "totalBooks": state.total_books,
        "recommended": state.recommended,
        "dashboard": state.user_dashboard,
    }))
}

async fn run_books(app: &Bookshelf, books: BooksCommand) -> Result<(), CliError> {
    enter(app, Route::MyBooks)?;
    let api = app.books();
    let mut view = app.my_books();

    match books.command {
        BooksSubcommand::List { tab, page } => {
            let tab = BookTab::from(tab);
            if tab == BookTab::default() {
                view.load(page).await;
            } else {
                view.switch_tab(tab).await;
                if page > 0 {
                    view.load(page).await;
                }
            }
            let state = view.state();
            if let Some(error) = &state.error {
                return Err(CliError::Rejected(error.clone()));
            }
            if tab == BookTab::Requested {
                print_json(&state.requests)?;
            } else {
                print_json(&state.books)?;
            }
            let cursor = &state.pagination;
            eprintln!(
                "page {} of {} ({} items)",
                cursor.page + 1,
                cursor.total_pages.max(1),
                cursor.total_items
            );
            Ok(())
        }
        BooksSubcommand::Get { id } => {
            if let Some(book) = api.get(id).await? {
                print_json(&book)?;
            }
            Ok(())
        }
        BooksSubcommand::Create(fields) => {
            view.save_book(None, &BookRequest::from(fields)).await;
            settled(app, view.state().error.clone())
        }
        BooksSubcommand::Update { id, fields } => {
            view.save_book(Some(id), &BookRequest::from(fields)).await;
            settled(app, view.state().error.clone())
        }
        BooksSubcommand::Delete { id } => {
            view.delete_book(id).await;
            settled(app, view.state().error.clone())
        }
        BooksSubcommand::Approve { id } => {
            view.approve_request(id).await;
            settled(app, view.state().error.clone())
        }
        BooksSubcommand::Reject { id } => {
            view.reject_request(id).await;
            settled(app, view.state().error.clone())
        }
        BooksSubcommand::Request { id } => {
            let mut dashboard = app.dashboard();
            dashboard.request_book(id).await;
            if let Some(message) = &dashboard.state().status_message {
                println!("{message}");
            }
            Ok(())
        }
        BooksSubcommand::Share { id } => done(api.update_shareable(id).await?),
        BooksSubcommand::Archive { id } => done(api.update_archived(id).await?),
        BooksSubcommand::Return { id } => done(api.return_borrowed(id).await?),
        BooksSubcommand::ApproveReturn { id } => done(api.approve_return(id).await?),
    }
}

async fn run_feedback(app: &Bookshelf, feedback: FeedbackCommand) -> Result<(), CliError> {
    enter(app, Route::Feedback)?;
    let api = app.feedback();
    let mut view = app.feedback_board();

    match feedback.command {
        FeedbackSubcommand::List { mine, sort, status, page } => {
            if let Some(status) = status {
                if let Some(result) = api.by_status(status.into(), page, FEEDBACK_PAGE_SIZE).await? {
                    print_json(result.items())?;
                }
                return Ok(());
            }
            if mine {
                view.switch_tab(FeedbackTab::Mine).await;
                if page > 0 {
                    view.load(page).await;
                }
            } else {
                view.load(page).await;
            }
            view.set_sort(sort.into());
            let state = view.state();
            if let Some(error) = &state.error {
                return Err(CliError::Rejected(error.clone()));
            }
            print_json(&state.sorted())
        }
        FeedbackSubcommand::Show { id } => {
            if let Some(item) = api.get(id).await? {
                print_json(&item)?;
            }
            Ok(())
        }
        FeedbackSubcommand::Submit { title, description } => {
            view.submit(&FeedbackRequest { title, description }).await;
            settled(app, view.state().action_error.clone())
        }
        FeedbackSubcommand::Edit { id, title, description } => {
            view.edit(id, &FeedbackRequest { title, description }).await;
            settled(app, view.state().action_error.clone())
        }
        FeedbackSubcommand::Delete { id } => {
            view.delete(id).await;
            settled(app, view.state().action_error.clone())
        }
        FeedbackSubcommand::Upvote { id } => done(api.toggle_upvote(id).await?),
        FeedbackSubcommand::Comment { id, message } => {
            view.comment(id, &message).await;
            settled(app, view.state().action_error.clone())
        }
    }
}

async fn run_profile(app: &Bookshelf, profile: ProfileCommand) -> Result<(), CliError> {
    enter(app, Route::Profile)?;
    let mut view = app.profile_view();

    match profile.command {
        ProfileSubcommand::Show => {
            view.load().await;
            if let Some(profile) = &view.state().profile {
                print_json(profile)?;
            }
            Ok(())
        }
        ProfileSubcommand::Dashboard => {
            view.load_dashboard().await;
            if let Some(dashboard) = &view.state().dashboard {
                print_json(dashboard)?;
            }
            Ok(())
        }
        ProfileSubcommand::Update { name, email } => {
            view.load().await;
            view.save(&name, &email).await;
            if let Some(error) = &view.state().error {
                return Err(CliError::Rejected(error.clone()));
            }
            if let Some(profile) = &view.state().profile {
                print_json(profile)?;
            }
            Ok(())
        }
    }
}

async fn run_search(app: &Bookshelf, query: &str) -> Result<(), CliError> {
    let search = app.book_search()?;
    let mut rx = search.subscribe();
    search.input(query);

    let outcome = tokio::time::timeout(
        SEARCH_TIMEOUT,
        rx.wait_for(|state| state.query == query && !state.searching),
    )
    .await
    .map_err(|_| CliError::Timeout)?;
    let results = match outcome {
        Ok(state) => state.results.clone(),
        Err(_) => Vec::new(),
    };

    let prefills: Vec<BookRequest> = results.iter().map(|book| book.to_book_request()).collect();
    print_json(&prefills)
}

fn enter(app: &Bookshelf, route: Route) -> Result<(), CliError> {
    if app.guard().enter(route) {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

fn settled(app: &Bookshelf, error: Option<String>) -> Result<(), CliError> {
    if let Some(error) = error {
        return Err(CliError::Rejected(error));
    }
    if app.router().current_route() != Route::Login {
        println!("ok");
    }
    Ok(())
}

fn done(outcome: Option<()>) -> Result<(), CliError> {
    if outcome.is_some() {
        println!("ok");
    }
    Ok(())
}

fn rejected(message: Option<String>) -> CliError {
    CliError::Rejected(message.unwrap_or_else(|| "request was not completed".to_owned()))
}

fn report_redirect(app: &Bookshelf) {
    let history = app.router().history();
    if let Some(location) = history.iter().rev().find(|location| location.route == Route::Login) {
        eprintln!("session ended; navigated to {location}");
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
