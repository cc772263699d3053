use hostel::prelude::*;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

const USAGE: &str = "usage: portal-demo <command>

commands:
  whoami                             show the stored session (default)
  login-student                      local student login
  login-staff <role> <id> <password> staff login against the API
  logout                             forget the stored session
  announcements                      list announcements live right now

environment:
  HOSTEL_STORAGE_DIR      where the session file lives
  HOSTEL_API_BASE_URL     API root, e.g. http://localhost:5000/api
  HOSTEL_RUNTIME_TARGET   web | android | ios
  HOSTEL_DEBUGGER_HOST    debugger address of a device build
  HOSTEL_API_PORT         API port (default 5000)
  RUST_LOG                log filter (default info)";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    WhoAmI,
    LoginStudent,
    LoginStaff { role: Role, staff_id: String, password: String },
    Logout,
    Announcements,
}

fn parse(args: &[String]) -> Result<Command, String> {
    let words: Vec<&str> = args.iter().map(String::as_str).collect();
    match words.as_slice() {
        [] | ["whoami"] => Ok(Command::WhoAmI),
        ["login-student"] => Ok(Command::LoginStudent),
        ["login-staff", role, staff_id, password] => Ok(Command::LoginStaff {
            role: Role::parse(role),
            staff_id: staff_id.to_string(),
            password: password.to_string(),
        }),
        ["logout"] => Ok(Command::Logout),
        ["announcements"] => Ok(Command::Announcements),
        _ => Err(USAGE.to_string()),
    }
}

fn describe(record: &SessionRecord) -> String {
    if !record.is_logged_in {
        return "logged out".to_string();
    }
    let role = record.role.as_ref().map_or("?", Role::as_str);
    let name = record.user_name.as_deref().unwrap_or("?");
    match (&record.hostel_name, record.is_mock()) {
        (Some(hostel), true) => format!("{name} ({role}, {hostel}, local session)"),
        (Some(hostel), false) => format!("{name} ({role}, {hostel})"),
        (None, true) => format!("{name} ({role}, local session)"),
        (None, false) => format!("{name} ({role})"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    hostel::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse(&args) {
        Ok(command) => command,
        Err(usage) => {
            eprintln!("{usage}");
            std::process::exit(2);
        }
    };

    let mut builder = Portal::builder();
    if let Some(dir) = std::env::var_os("HOSTEL_STORAGE_DIR") {
        builder = builder.storage_dir(dir);
    }
    let portal = builder.build().await?;

    match command {
        Command::WhoAmI => {
            println!("{}", describe(&portal.current()));
            if let Some(profile) = portal.student_profile() {
                println!("  enrollment {} / room {}", profile.enrollment, profile.room);
            }
        }
        Command::LoginStudent => {
            let record = portal.login(LoginRequest::student()).await?;
            println!("logged in as {}", describe(&record));
        }
        Command::LoginStaff {
            role,
            staff_id,
            password,
        } => {
            let request = LoginRequest::staff(role.clone(), staff_id, password);
            match portal.login(request).await {
                Ok(record) => println!("logged in as {}", describe(&record)),
                Err(HostelError::Session(e)) => {
                    eprintln!("{}", e.user_message(&role));
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Logout => {
            portal.logout().await;
            println!("{}", describe(&portal.current()));
        }
        Command::Announcements => {
            portal.refresh_announcements().await?;
            let live = portal.board().active_at(chrono::Utc::now());
            if live.is_empty() {
                println!("no announcements");
            }
            for announcement in live {
                println!("- {}", announcement.message);
            }
        }
    }

    tracing::debug!("done");
    Ok(())
}
