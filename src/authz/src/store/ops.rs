//! CRUD over a policy snapshot, shared by every store backend

use rbac_core::{
    ClusterRole, ClusterRoleBinding, CoreError, PolicyDocument, Result, Role, RoleBinding,
};

pub(crate) fn get_role(doc: &PolicyDocument, name: &str, namespace: &str) -> Result<Role> {
    doc.find_role(name, namespace)
        .map(|i| doc.roles[i].clone())
        .ok_or_else(|| {
            CoreError::not_found(format!(
                "Role with name '{}' in namespace '{}' does not exist",
                name, namespace
            ))
        })
}

pub(crate) fn create_role(doc: &mut PolicyDocument, role: Role) -> Result<()> {
    role.validate()?;
    if doc.find_role(&role.name, &role.namespace).is_some() {
        return Err(CoreError::already_exists(format!(
            "Role with name '{}' in namespace '{}' already exists",
            role.name, role.namespace
        )));
    }
    doc.roles.push(role);
    Ok(())
}

pub(crate) fn update_role(doc: &mut PolicyDocument, role: Role) -> Result<()> {
    role.validate()?;
    let i = doc.find_role(&role.name, &role.namespace).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to update role '{}' in namespace '{}' that does not exist",
            role.name, role.namespace
        ))
    })?;
    doc.roles[i] = role;
    Ok(())
}

pub(crate) fn delete_role(doc: &mut PolicyDocument, name: &str, namespace: &str) -> Result<()> {
    let i = doc.find_role(name, namespace).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to delete role '{}' in namespace '{}' that does not exist",
            name, namespace
        ))
    })?;
    doc.roles.remove(i);
    Ok(())
}

pub(crate) fn get_role_binding(
    doc: &PolicyDocument,
    name: &str,
    namespace: &str,
) -> Result<RoleBinding> {
    doc.find_role_binding(name, namespace)
        .map(|i| doc.role_bindings[i].clone())
        .ok_or_else(|| {
            CoreError::not_found(format!(
                "Role binding with name '{}' in namespace '{}' does not exist",
                name, namespace
            ))
        })
}

pub(crate) fn create_role_binding(doc: &mut PolicyDocument, binding: RoleBinding) -> Result<()> {
    binding.validate()?;
    if doc.find_role_binding(&binding.name, &binding.namespace).is_some() {
        return Err(CoreError::already_exists(format!(
            "Role binding with name '{}' in namespace '{}' already exists",
            binding.name, binding.namespace
        )));
    }
    doc.role_bindings.push(binding);
    Ok(())
}

pub(crate) fn update_role_binding(doc: &mut PolicyDocument, binding: RoleBinding) -> Result<()> {
    binding.validate()?;
    let i = doc
        .find_role_binding(&binding.name, &binding.namespace)
        .ok_or_else(|| {
            CoreError::not_found(format!(
                "Attempting to update role binding '{}' in namespace '{}' that does not exist",
                binding.name, binding.namespace
            ))
        })?;
    doc.role_bindings[i] = binding;
    Ok(())
}

pub(crate) fn delete_role_binding(
    doc: &mut PolicyDocument,
    name: &str,
    namespace: &str,
) -> Result<()> {
    let i = doc.find_role_binding(name, namespace).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to delete role binding '{}' in namespace '{}' that does not exist",
            name, namespace
        ))
    })?;
    doc.role_bindings.remove(i);
    Ok(())
}

pub(crate) fn list_role_bindings(doc: &PolicyDocument, namespace: &str) -> Vec<RoleBinding> {
    doc.role_bindings
        .iter()
        .filter(|b| b.namespace == namespace)
        .cloned()
        .collect()
}

pub(crate) fn get_cluster_role(doc: &PolicyDocument, name: &str) -> Result<ClusterRole> {
    doc.find_cluster_role(name)
        .map(|i| doc.cluster_roles[i].clone())
        .ok_or_else(|| CoreError::not_found(format!("Cluster role '{}' does not exist", name)))
}

pub(crate) fn create_cluster_role(doc: &mut PolicyDocument, role: ClusterRole) -> Result<()> {
    role.validate()?;
    if doc.find_cluster_role(&role.name).is_some() {
        return Err(CoreError::already_exists(format!(
            "Cluster role '{}' already exists",
            role.name
        )));
    }
    doc.cluster_roles.push(role);
    Ok(())
}

pub(crate) fn update_cluster_role(doc: &mut PolicyDocument, role: ClusterRole) -> Result<()> {
    role.validate()?;
    let i = doc.find_cluster_role(&role.name).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to update cluster role '{}' that does not exist",
            role.name
        ))
    })?;
    doc.cluster_roles[i] = role;
    Ok(())
}

pub(crate) fn delete_cluster_role(doc: &mut PolicyDocument, name: &str) -> Result<()> {
    let i = doc.find_cluster_role(name).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to delete cluster role '{}' that does not exist",
            name
        ))
    })?;
    doc.cluster_roles.remove(i);
    Ok(())
}

pub(crate) fn get_cluster_role_binding(
    doc: &PolicyDocument,
    name: &str,
) -> Result<ClusterRoleBinding> {
    doc.find_cluster_role_binding(name)
        .map(|i| doc.cluster_role_bindings[i].clone())
        .ok_or_else(|| {
            CoreError::not_found(format!("Cluster role binding '{}' does not exist", name))
        })
}

pub(crate) fn create_cluster_role_binding(
    doc: &mut PolicyDocument,
    binding: ClusterRoleBinding,
) -> Result<()> {
    binding.validate()?;
    if doc.find_cluster_role_binding(&binding.name).is_some() {
        return Err(CoreError::already_exists(format!(
            "Cluster role binding '{}' already exists",
            binding.name
        )));
    }
    doc.cluster_role_bindings.push(binding);
    Ok(())
}

pub(crate) fn update_cluster_role_binding(
    doc: &mut PolicyDocument,
    binding: ClusterRoleBinding,
) -> Result<()> {
    binding.validate()?;
    let i = doc.find_cluster_role_binding(&binding.name).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to update cluster role binding '{}' that does not exist",
            binding.name
        ))
    })?;
    doc.cluster_role_bindings[i] = binding;
    Ok(())
}

pub(crate) fn delete_cluster_role_binding(doc: &mut PolicyDocument, name: &str) -> Result<()> {
    let i = doc.find_cluster_role_binding(name).ok_or_else(|| {
        CoreError::not_found(format!(
            "Attempting to delete cluster role binding '{}' that does not exist",
            name
        ))
    })?;
    doc.cluster_role_bindings.remove(i);
    Ok(())
}
