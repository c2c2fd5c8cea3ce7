use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sign in with email and password
    SignIn {
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account and fill in the profile
    SignUp {
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        district: Option<String>,

        /// Medical specialty (nurse, midwife, ...)
        #[arg(long)]
        specialty: Option<String>,

        /// Health facility
        #[arg(long)]
        structure: Option<String>,
    },

    /// End the current session
    SignOut,

    /// Show the signed-in member
    Whoami,

    /// Show the feed
    Feed {
        /// Keep running and reprint on every change
        #[arg(long)]
        follow: bool,
    },

    /// Publish a post
    Post {
        content: String,

        #[arg(long)]
        image_url: Option<String>,
    },

    /// Like a post
    Like { post_id: String },

    /// Remove a like
    Unlike { post_id: String },

    /// Show the comments of a post
    Comments { post_id: String },

    /// Comment on a post
    Comment { post_id: String, content: String },

    /// List your conversations
    Conversations,

    /// Open a conversation with other members
    StartConversation {
        /// Member ids (UUID)
        #[arg(required = true)]
        participants: Vec<String>,
    },

    /// Show the messages of a conversation
    Messages {
        conversation_id: String,

        /// Keep running and reprint on every new message
        #[arg(long)]
        follow: bool,
    },

    /// Send a message
    Send {
        conversation_id: String,
        content: String,
    },

    /// Browse the professional directory
    Directory {
        #[arg(long)]
        district: Option<String>,

        #[arg(long)]
        specialty: Option<String>,

        /// Part of the name, any case
        #[arg(long)]
        search: Option<String>,
    },
}

impl Commands {
    /// Whether the command acts as the signed-in member
    pub fn requires_member(&self) -> bool {
        matches!(
            self,
            Commands::Post { .. }
                | Commands::Like { .. }
                | Commands::Unlike { .. }
                | Commands::Comment { .. }
                | Commands::Conversations
                | Commands::StartConversation { .. }
                | Commands::Messages { .. }
                | Commands::Send { .. }
        )
    }
}
