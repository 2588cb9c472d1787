mod commands;
mod session;
mod telemetry;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "munch", about = "Fair restaurant picks for you and your group", version)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Acting user (defaults to $MUNCH_USER)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Report decision events to stderr after the command
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new munch repository
    Init,

    /// Manage the restaurant registry
    Restaurant {
        #[command(subcommand)]
        action: RestaurantAction,
    },

    /// Manage collections of restaurants
    Collection {
        #[command(subcommand)]
        action: CollectionAction,
    },

    /// Manage groups
    Group {
        #[command(subcommand)]
        action: GroupAction,
    },

    /// Draw a restaurant from a collection by weighted lottery
    Select {
        /// Collection to draw from
        collection: String,

        /// When you plan to go (RFC 3339 or YYYY-MM-DD, default now)
        #[arg(long)]
        visit_date: Option<String>,
    },

    /// Record a visit made without a draw
    Visit {
        /// Collection the restaurant belongs to
        collection: String,

        /// Restaurant visited
        restaurant: String,

        /// Date of the visit (RFC 3339 or YYYY-MM-DD, default now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Run decisions for a group
    GroupDecision {
        #[command(subcommand)]
        action: GroupDecisionAction,
    },

    /// Submit or replace your ranked ballot
    Vote {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,

        /// Restaurants in order of preference
        #[arg(required = true)]
        restaurants: Vec<String>,
    },

    /// Tally the ballots of a tiered decision
    Complete {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Draw the result of a random group decision
    Resolve {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Close an active group decision without a result (admins only)
    Close {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Mark an overdue decision as expired
    Expire {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// List a group's decisions, newest first
    List {
        /// Group ID
        group: String,
    },

    /// Show details of a decision
    Show {
        /// Decision ID (full or prefix, minimum 4 chars)
        id: String,
    },

    /// Selection statistics for a collection
    Stats {
        /// Collection ID
        collection: String,
    },
}

#[derive(Subcommand)]
enum RestaurantAction {
    /// Register a restaurant
    Add {
        /// Restaurant ID
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// ID in an external catalogue
        #[arg(long)]
        external_id: Option<String>,

        #[arg(long)]
        cuisine: Option<String>,
    },
    /// List registered restaurants
    List,
}

#[derive(Subcommand)]
enum CollectionAction {
    /// Create an empty collection owned by the acting user
    Create {
        /// Collection ID
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,
    },
    /// Add a restaurant to a collection
    Add {
        /// Collection ID
        collection: String,

        /// Restaurant ID, or external ID with --external
        restaurant: String,

        /// Treat the restaurant argument as an external ID
        #[arg(long)]
        external: bool,
    },
    /// Show a collection and its restaurants
    Show {
        /// Collection ID
        id: String,
    },
}

#[derive(Subcommand)]
enum GroupAction {
    /// Create a group; the acting user becomes an admin
    Create {
        /// Group ID
        id: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Additional admins (repeatable)
        #[arg(long)]
        admin: Vec<String>,

        /// Members (repeatable)
        #[arg(long)]
        member: Vec<String>,
    },
}

#[derive(Subcommand)]
enum GroupDecisionAction {
    /// Open a decision for voting or a later draw
    Start {
        /// Collection to choose from
        collection: String,

        /// Deciding group
        group: String,

        /// Participants (repeatable, default the whole group)
        #[arg(long)]
        participant: Vec<String>,

        /// Decision method (tiered, random)
        #[arg(long, default_value = "tiered")]
        method: String,

        /// Hours until voting closes
        #[arg(long, default_value = "24")]
        deadline_hours: i64,

        /// When the group plans to go (RFC 3339 or YYYY-MM-DD, default now)
        #[arg(long)]
        visit_date: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init() {
        eprintln!("warning: logging disabled: {:#}", e);
    }

    if cli.verbose {
        session::record_events();
    }

    let json = cli.json;
    let user = cli.user;
    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Restaurant { action } => match action {
            RestaurantAction::Add {
                id,
                name,
                external_id,
                cuisine,
            } => commands::restaurant::add(id, name, external_id, cuisine),
            RestaurantAction::List => commands::restaurant::list(json),
        },
        Commands::Collection { action } => match action {
            CollectionAction::Create { id, name } => {
                commands::collection::create(id, name, user)
            }
            CollectionAction::Add {
                collection,
                restaurant,
                external,
            } => commands::collection::add(collection, restaurant, external),
            CollectionAction::Show { id } => commands::collection::show(id, json),
        },
        Commands::Group { action } => match action {
            GroupAction::Create {
                id,
                name,
                admin,
                member,
            } => commands::group::create(id, name, admin, member, user),
        },
        Commands::Select {
            collection,
            visit_date,
        } => commands::select::run(collection, visit_date, user, json),
        Commands::Visit {
            collection,
            restaurant,
            date,
        } => commands::visit::run(collection, restaurant, date, user, json),
        Commands::GroupDecision { action } => match action {
            GroupDecisionAction::Start {
                collection,
                group,
                participant,
                method,
                deadline_hours,
                visit_date,
            } => commands::group_decision::start(
                collection,
                group,
                participant,
                method,
                deadline_hours,
                visit_date,
                json,
            ),
        },
        Commands::Vote { id, restaurants } => commands::vote::run(id, restaurants, user, json),
        Commands::Complete { id } => commands::resolve::complete(id, json),
        Commands::Resolve { id } => commands::resolve::draw(id, json),
        Commands::Close { id } => commands::close::close(id, user, json),
        Commands::Expire { id } => commands::close::expire(id, json),
        Commands::List { group } => commands::list::run(group, json),
        Commands::Show { id } => commands::show::run(id, json),
        Commands::Stats { collection } => commands::stats::run(collection, json),
    };

    if cli.verbose {
        for event in session::recorded_events() {
            eprintln!("{}", session::event_line(&event));
        }
    }

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
