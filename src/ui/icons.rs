pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const UP: &str = "⬆️";
    pub const DOWN: &str = "⬇️";
    pub const STAR: &str = "⭐";
    pub const BRIEFCASE: &str = "💼";
}
