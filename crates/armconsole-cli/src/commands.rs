//! The four menu commands.
//!
//! Each handler prompts for its inputs, calls the [`ResourceManager`] and
//! prints the outcome. Collaborator failures come back as
//! [`CommandError::Failed`] carrying the operator-facing headline; the
//! dispatcher prints them and shows the menu again.

use std::io::{BufRead, Write};

use armconsole_models::VmParameters;
use armconsole_sdk::ResourceManager;
use tracing::debug;

use crate::console::Console;
use crate::error::{CommandError, ConsoleError};
use crate::table;

/// Columns of the resource group listing.
pub const RESOURCE_GROUP_COLUMNS: [&str; 3] = ["Id", "Name", "Provisioning state"];

/// `1`: list resource groups as a table.
pub async fn list_resource_groups<M, R, W>(manager: &M, console: &mut Console<R, W>) -> Result<(), CommandError>
where
    M: ResourceManager,
    R: BufRead,
    W: Write,
{
    let groups = manager
        .list_resource_groups()
        .await
        .map_err(|e| CommandError::failed("Error during listing of ResourceGroups", e))?;

    let rows: Vec<Vec<String>> = groups
        .iter()
        .map(|g| vec![g.id.clone(), g.name.clone(), g.provisioning_state().to_string()])
        .collect();
    console.write_raw(&table::render(&RESOURCE_GROUP_COLUMNS, &rows))?;
    Ok(())
}

/// `2`: create a resource group.
pub async fn create_resource_group<M, R, W>(manager: &M, console: &mut Console<R, W>) -> Result<(), CommandError>
where
    M: ResourceManager,
    R: BufRead,
    W: Write,
{
    const CONTEXT: &str = "Error during creation of ResourceGroup";
    let name = console.prompt("Name of the new ResourceGroup: ")?;
    let region = console.prompt("Region of the ResourceGroup: ")?;
    let name = non_blank(name).map_err(|e| CommandError::failed(CONTEXT, e))?;

    let group = manager
        .create_resource_group(&name, &region)
        .await
        .map_err(|e| CommandError::failed(CONTEXT, e))?;
    console.say(&format!("Done: {}", group.id))?;
    Ok(())
}

/// `3`: deploy an ARM template file with admin credentials.
///
/// An unreadable file ends the command before the remaining prompts.
pub async fn deploy_template<M, R, W>(manager: &M, console: &mut Console<R, W>) -> Result<(), CommandError>
where
    M: ResourceManager,
    R: BufRead,
    W: Write,
{
    let path = console.prompt("File Path to ARM File: ")?;
    let template = std::fs::read_to_string(&path).map_err(|source| {
        CommandError::failed(
            "Error during reading the ARM File",
            ConsoleError::TemplateRead { path: path.clone(), source },
        )
    })?;
    debug!(%path, bytes = template.len(), "template loaded");

    let resource_group = console.prompt("ResourceGroupName: ")?;
    let admin_username = console.prompt("AdminUsername: ")?;
    let admin_password = console.prompt_secret("AdminPassword: ")?;
    let resource_group =
        non_blank(resource_group).map_err(|e| CommandError::failed("Error during ARM deployment", e))?;
    let parameters = VmParameters::new(&admin_username, admin_password).to_arm_parameters();

    let deployment = manager
        .deploy_template(&resource_group, &template, &parameters)
        .await
        .map_err(|e| CommandError::failed("Error during ARM deployment", e))?;
    console.say(&format!(
        "Deployment ({}) started: {}",
        deployment.name,
        deployment.provisioning_state()
    ))?;
    Ok(())
}

/// `4`: delete a resource group and wait for it to be gone.
pub async fn delete_resource_group<M, R, W>(manager: &M, console: &mut Console<R, W>) -> Result<(), CommandError>
where
    M: ResourceManager,
    R: BufRead,
    W: Write,
{
    let name = console.prompt("Name of the ResourceGroup to delete: ")?;
    let context = format!("Error during deletion of ResourceGroup: {name}");
    let name = non_blank(name).map_err(|e| CommandError::failed(&context, e))?;

    manager
        .delete_resource_group(&name)
        .await
        .map_err(|e| CommandError::failed(&context, e))?;
    console.say(&format!("{name} successfully deleted"))?;
    Ok(())
}

/// A blank resource group name would address the whole collection.
fn non_blank(name: String) -> Result<String, ConsoleError> {
    if name.is_empty() {
        Err(ConsoleError::BlankInput("resource group name"))
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeManager, SUB};
    use std::io::Cursor;

    type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    fn console(input: &str) -> TestConsole {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), false)
    }

    fn output(console: TestConsole) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    fn failure(err: CommandError) -> (String, String) {
        match err {
            CommandError::Failed { context, source } => (context, source.to_string()),
            CommandError::Fatal(err) => panic!("unexpected fatal error: {err}"),
        }
    }

    fn template_file(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(format!("armconsole-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn list_renders_a_table() {
        let manager = FakeManager::with_groups(&["alpha", "bravo"]);
        let mut console = console("");
        list_resource_groups(&manager, &mut console).await.unwrap();

        let out = output(console);
        assert!(out.starts_with("+-"));
        assert!(out.contains("| Id "));
        assert!(out.contains("| Provisioning state |"));
        assert!(out.contains(&format!("/subscriptions/{SUB}/resourceGroups/alpha")));
        assert!(out.contains("| bravo "));
    }

    #[tokio::test]
    async fn create_prints_the_new_id() {
        let manager = FakeManager::default();
        let mut console = console("rg-demo\nwesteurope\n");
        create_resource_group(&manager, &mut console).await.unwrap();

        assert_eq!(manager.calls(), vec!["create rg-demo westeurope"]);
        assert_eq!(
            output(console),
            format!(
                "Name of the new ResourceGroup: Region of the ResourceGroup: Done: /subscriptions/{SUB}/resourceGroups/rg-demo\n"
            )
        );
    }

    #[tokio::test]
    async fn create_conflict_is_a_reportable_failure() {
        let manager = FakeManager::with_groups(&["rg-demo"]);
        let mut console = console("rg-demo\nwesteurope\n");
        let err = create_resource_group(&manager, &mut console).await.unwrap_err();

        let (context, message) = failure(err);
        assert_eq!(context, "Error during creation of ResourceGroup");
        assert_eq!(message, "the resource group 'rg-demo' already exists");
    }

    #[tokio::test]
    async fn deploy_sends_admin_parameters() {
        let path = template_file("ok.json", r#"{ "resources": [] }"#);
        let manager = FakeManager::with_groups(&["rg-vm"]);
        let mut console = console(&format!("{path}\nrg-vm\nazureuser\nP@ss\n"));
        deploy_template(&manager, &mut console).await.unwrap();

        let parameters = manager.parameters.borrow().clone().unwrap();
        assert_eq!(parameters["adminUsername"]["value"], "azureuser");
        assert_eq!(parameters["adminPassword"]["value"], "P@ss");

        let out = output(console);
        assert!(out.contains("AdminPassword: ****\r\n"));
        assert!(!out.contains("P@ss"));
        assert!(out.ends_with("Deployment (Deployment-1) started: Accepted\n"));
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn unreadable_template_skips_the_deployment() {
        let manager = FakeManager::default();
        let mut console = console("/definitely/not/here.json\nrg\n");
        let err = deploy_template(&manager, &mut console).await.unwrap_err();

        let (context, message) = failure(err);
        assert_eq!(context, "Error during reading the ARM File");
        assert!(message.starts_with("could not read '/definitely/not/here.json'"));
        assert!(manager.calls().is_empty());
        assert_eq!(output(console), "File Path to ARM File: ");
    }

    #[tokio::test]
    async fn rejected_deployment_is_reported() {
        let path = template_file("bad.json", "{ nope");
        let manager = FakeManager::with_groups(&["rg"]);
        let mut console = console(&format!("{path}\nrg\nazureuser\npw\n"));
        let err = deploy_template(&manager, &mut console).await.unwrap_err();

        let (context, message) = failure(err);
        assert_eq!(context, "Error during ARM deployment");
        assert!(message.starts_with("deployment failed: template is not valid JSON"));
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn delete_reports_success_and_absence() {
        let manager = FakeManager::with_groups(&["doomed"]);
        let mut console = console("doomed\nghost\n");

        delete_resource_group(&manager, &mut console).await.unwrap();
        let err = delete_resource_group(&manager, &mut console).await.unwrap_err();

        let (context, message) = failure(err);
        assert_eq!(context, "Error during deletion of ResourceGroup: ghost");
        assert_eq!(message, "resource group 'ghost' could not be found");
        assert!(output(console).contains("doomed successfully deleted\n"));
        assert!(manager.groups.borrow().is_empty());
    }

    #[tokio::test]
    async fn blank_names_never_reach_the_manager() {
        let path = template_file("blank.json", r#"{ "resources": [] }"#);
        let manager = FakeManager::with_groups(&["keep"]);
        let mut console = console(&format!(" \nwesteurope\n{path}\n\nazureuser\npw\n\t\n"));

        let create = failure(create_resource_group(&manager, &mut console).await.unwrap_err());
        let deploy = failure(deploy_template(&manager, &mut console).await.unwrap_err());
        let delete = failure(delete_resource_group(&manager, &mut console).await.unwrap_err());

        assert_eq!(create.0, "Error during creation of ResourceGroup");
        assert_eq!(deploy.0, "Error during ARM deployment");
        assert_eq!(delete.0, "Error during deletion of ResourceGroup: ");
        for (_, message) in [&create, &deploy, &delete] {
            assert_eq!(message, "the resource group name must not be empty");
        }
        assert!(manager.calls().is_empty());
        assert_eq!(manager.groups.borrow().len(), 1);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn closed_input_is_fatal() {
        let manager = FakeManager::default();
        let mut console = console("only-a-name\n");
        let err = create_resource_group(&manager, &mut console).await.unwrap_err();
        assert!(matches!(err, CommandError::Fatal(ConsoleError::InputStreamClosed)));
        assert!(manager.calls().is_empty());
    }
}
