//! The CloudFormation document the installer deploys.

use crate::model::stack_name::StackName;

const TEMPLATE: &str = include_str!("../templates/access-stack.yaml");
const PLACEHOLDER: &str = "{{stack_name}}";

/// Substitutes the stack name into every IAM resource name of the template.
pub fn render(stack_name: &StackName) -> String {
    TEMPLATE.replace(PLACEHOLDER, stack_name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(name: &str) -> String {
        render(&StackName::parse(name).unwrap())
    }

    #[test]
    fn leaves_no_placeholder_behind() {
        let body = rendered("demo");
        assert!(!body.contains(PLACEHOLDER));
        assert!(!body.contains("{{"));
    }

    #[test]
    fn names_every_resource_after_the_stack() {
        let body = rendered("demo");
        assert!(body.contains("UserName: \"demo-user\""), "{body}");
        assert!(body.contains("RoleName: \"demo-role\""), "{body}");
        assert!(body.contains("PolicyName: \"demo-policy\""), "{body}");
    }

    #[test]
    fn substitutes_consistently() {
        let placeholders = TEMPLATE.matches(PLACEHOLDER).count();
        assert!(placeholders >= 3);

        // a name that cannot otherwise occur in the template
        let body = rendered("zqx-stack");
        assert_eq!(body.matches("zqx-stack").count(), placeholders);
        assert_eq!(
            body.len(),
            TEMPLATE.len() - placeholders * (PLACEHOLDER.len() - "zqx-stack".len())
        );
    }

    #[test]
    fn exposes_every_output_we_read() {
        use crate::model::credentials::*;

        let body = rendered("demo");
        for key in [
            ACCOUNT_ID,
            REGION,
            ACCESS_KEY_ID,
            SECRET_ACCESS_KEY,
            ROLE_ARN,
            USER_NAME,
            ROLE_NAME,
        ] {
            assert!(body.contains(&format!("\n  {key}:\n")), "missing output {key}");
        }
    }
}
